#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

pub mod boxed;
pub mod choice_tree;
pub mod collection;
pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod filter_map;
pub mod flatten;
pub mod fuzzcheck;
pub mod generator;
pub mod lazy_seq;
pub mod list_shrink;
pub mod map;
pub mod one_of;
pub mod primitive;
pub mod quickcheck;
pub mod random;
pub mod reflect;
pub mod report;
pub mod shrink_search;
pub mod size;
pub mod smallcheck;
pub mod zip;

pub use config::Config;
pub use driver::Test;
pub use error::{Cause, GeneratorError, Prove};
pub use generator::Generator;
pub use reflect::{Reflect, Registry};

/*
    TODO:
    - Run the three strategies concurrently across CPUs once ChoiceTree's
      `Arc` sharing is audited for that; today everything is intentionally
      single-threaded (spec.md §5).
*/
