#![allow(dead_code)]

use envar::Bind;

#[derive(Bind)]
struct Pair(String, u16);

fn main() {}
