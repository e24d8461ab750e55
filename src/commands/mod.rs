pub mod menu;
pub mod products;
pub mod run;
pub mod youtube;
