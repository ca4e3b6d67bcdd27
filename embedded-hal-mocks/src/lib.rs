pub mod delay;
pub mod digital;
pub mod spi;
