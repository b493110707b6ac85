mod cta_tests;
mod palette_tests;
