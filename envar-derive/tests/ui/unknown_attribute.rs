#![allow(dead_code)]

use envar::Bind;

#[derive(Bind)]
struct Config {
    #[env(default = 8080)]
    port: u16,
}

fn main() {}
