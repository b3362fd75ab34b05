//! Cart Fixtures

use serde::Deserialize;

/// Cart fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in display order
    pub lines: Vec<CartLineFixture>,
}

/// One line of a cart fixture
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Catalog product id
    pub product: String,

    /// Units; zero is rejected when the cart is built
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}
