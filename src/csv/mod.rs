mod header;
mod tokenizer;
mod writer;

pub use header::Header;
pub use tokenizer::split_line;
pub use writer::{append_listings, escape_field};
