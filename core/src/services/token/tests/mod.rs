#[cfg(test)]
mod service_tests;
