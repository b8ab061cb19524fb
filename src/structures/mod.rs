pub mod fp;
pub mod fq;
pub mod matrix;
pub mod poly;
