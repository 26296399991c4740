pub mod delay;
pub mod select;
