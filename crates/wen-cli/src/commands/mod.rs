pub mod encode_type;
pub mod hash;
pub mod pack;
pub mod unpack;
