#![allow(dead_code)]

use envar::Bind;

#[derive(Bind)]
enum Mode {
    Fast,
    Slow,
}

fn main() {}
