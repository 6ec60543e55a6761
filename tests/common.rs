#![allow(dead_code)]

pub use statecheck::{
    choice_tree, config::Config, driver::Test, error::GeneratorError, generator::Generator,
    one_of::OneConstantOf,
    primitive::{Int, Str, bool_generator},
};
