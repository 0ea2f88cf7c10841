pub mod board;
pub mod framer;
pub mod partitioner;
pub mod pixel;
pub mod pixel_record;
pub mod region;
pub mod utils;
