#[cfg(test)]
mod repository_tests;
