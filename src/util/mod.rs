pub mod sanitize;
#[cfg(test)]
pub mod test_server;
