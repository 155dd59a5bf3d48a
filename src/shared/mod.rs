pub mod constants;
pub mod media_url;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
pub mod validation;
