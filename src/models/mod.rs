mod pod;

pub use pod::*;
