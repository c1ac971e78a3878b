/// Unit tests for the calculators and the persisted store
mod streak_tests;
mod achievement_tests;
mod store_tests;
