pub mod constants;
pub mod templates;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
