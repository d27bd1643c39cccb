pub mod inspect;
pub mod scalar;
pub mod varint;
