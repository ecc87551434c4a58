/// Scene export command.
pub mod export;
/// Spatial hierarchy inspection command.
pub mod tree;
/// Shared option loading and logging setup.
pub mod util;

#[cfg(test)]
mod test_support;
