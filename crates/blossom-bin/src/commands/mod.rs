pub mod hash;
pub mod inspect;
pub mod parse;
