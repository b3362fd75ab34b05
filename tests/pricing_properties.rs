//! Pricing properties of the cart path, checked through the public API.
//!
//! Amounts are in centavos: `20_000` is R$ 200,00.

use rusty_money::{Money, iso::BRL};
use testresult::TestResult;
use thiserror::Error;

use vitrine::{
    cart::{Cart, CartError, CartLine, Quantity},
    catalog::{CatalogError, CatalogItem},
    pricing::{
        apply_site_discount, cart_totals, checkout_pix_price, is_wholesale_eligible, line_total,
        unit_price,
    },
};

#[derive(Debug, Error)]
enum SetupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("zero quantity")]
    ZeroQuantity,
}

fn brl<'a>(minor: i64) -> Money<'a, rusty_money::iso::Currency> {
    Money::from_minor(minor, BRL)
}

fn line<'a>(id: &str, minor: i64, units: u32) -> Result<CartLine<'a>, SetupError> {
    let item = CatalogItem::new(id, id, brl(minor))?;
    let quantity = Quantity::new(units).ok_or(SetupError::ZeroQuantity)?;

    Ok(CartLine::new(item, quantity))
}

fn cart<'a>(lines: impl IntoIterator<Item = CartLine<'a>>) -> Result<Cart<'a>, SetupError> {
    Ok(Cart::with_lines(lines, BRL)?)
}

#[test]
fn site_price_stays_within_zero_and_cap() -> TestResult {
    let prices = [0, 1, 2, 999, 20_000, 49_987, 49_988, 49_999, 100_000, 10_000_000];

    for minor in prices {
        let price = apply_site_discount(&brl(minor))?;

        assert!(price.to_minor_units() <= 39_990, "{minor} discounted above the cap");
        assert!(price.to_minor_units() >= 0, "{minor} discounted below zero");
    }

    Ok(())
}

#[test]
fn site_price_is_monotonic_below_the_cap() -> TestResult {
    // The cap binds from 499.875 upwards. Prices two centavos apart stay
    // distinct after rounding to the centavo.
    let mut previous = apply_site_discount(&brl(0))?;

    for minor in (2..49_980).step_by(2) {
        let current = apply_site_discount(&brl(minor))?;

        assert!(
            previous.to_minor_units() < current.to_minor_units(),
            "{minor} did not increase the site price"
        );

        previous = current;
    }

    Ok(())
}

#[test]
fn site_price_is_flat_above_the_cap() -> TestResult {
    for minor in [49_988, 50_000, 100_000, 1_000_000] {
        assert_eq!(apply_site_discount(&brl(minor))?, brl(39_990));
    }

    Ok(())
}

#[test]
fn wholesale_threshold_boundary() -> TestResult {
    let four = line("foam", 20_000, 4)?;
    let five = line("foam", 20_000, 5)?;
    let single = line("towel", 5_000, 1)?;

    assert!(!is_wholesale_eligible(&four, 4));
    assert!(is_wholesale_eligible(&five, 0));
    assert!(is_wholesale_eligible(&five, 5));
    assert!(is_wholesale_eligible(&single, 5));

    let singles = (0..5)
        .map(|n| line(&format!("item-{n}"), 10_000, 1))
        .collect::<Result<Vec<_>, _>>()?;
    let spread = cart(singles)?;
    let totals = cart_totals(&spread)?;

    assert_eq!(totals.total_items, 5);
    assert!(totals.lines.iter().all(|quote| quote.wholesale));

    Ok(())
}

#[test]
fn savings_are_exactly_zero_below_threshold() -> TestResult {
    let carts = [
        cart([line("foam", 20_000, 1)?])?,
        cart([line("foam", 19_999, 2)?, line("towel", 4_999, 2)?])?,
        cart([
            line("wax", 12_990, 1)?,
            line("clay", 10_000, 1)?,
            line("coating", 89_990, 1)?,
            line("towel", 5_000, 1)?,
        ])?,
    ];

    for cart in &carts {
        let totals = cart_totals(cart)?;

        assert!(totals.total_items < 5);
        assert_eq!(totals.total_savings, brl(0));
        assert!(totals.lines.iter().all(|quote| !quote.wholesale));
    }

    Ok(())
}

#[test]
fn pix_takes_five_percent() -> TestResult {
    assert_eq!(checkout_pix_price(&brl(10_000))?, brl(9_500));

    Ok(())
}

#[test]
fn single_unit_is_not_wholesale() -> TestResult {
    let single = line("foam", 20_000, 1)?;

    assert_eq!(apply_site_discount(&brl(20_000))?, brl(16_000));
    assert!(!is_wholesale_eligible(&single, 1));
    assert_eq!(unit_price(&single, 1)?, brl(16_000));
    assert_eq!(line_total(&single, 1)?, brl(16_000));

    Ok(())
}

#[test]
fn five_units_on_one_line_are_wholesale() -> TestResult {
    let bulk = line("foam", 20_000, 5)?;

    assert!(is_wholesale_eligible(&bulk, 5));
    assert_eq!(unit_price(&bulk, 5)?, brl(12_800));
    assert_eq!(line_total(&bulk, 5)?, brl(64_000));

    let totals = cart_totals(&cart([bulk])?)?;

    assert_eq!(totals.total_price, brl(64_000));
    assert_eq!(totals.total_savings, brl(16_000));

    Ok(())
}

#[test]
fn expensive_item_hits_the_cap() -> TestResult {
    assert_eq!(apply_site_discount(&brl(100_000))?, brl(39_990));

    Ok(())
}

#[test]
fn cart_quantity_makes_every_line_wholesale() -> TestResult {
    let foam = line("foam", 20_000, 3)?;
    let towel = line("towel", 5_000, 3)?;

    assert!(is_wholesale_eligible(&foam, 6));
    assert!(is_wholesale_eligible(&towel, 6));

    let totals = cart_totals(&cart([foam, towel])?)?;

    // 128 * 3 + 32 * 3
    assert_eq!(totals.total_items, 6);
    assert_eq!(totals.total_price, brl(48_000));
    // (160 * 3 + 40 * 3) - 480
    assert_eq!(totals.total_savings, brl(12_000));

    Ok(())
}

#[test]
fn site_discount_applied_twice_double_discounts() -> TestResult {
    let once = apply_site_discount(&brl(20_000))?;
    let twice = apply_site_discount(&once)?;

    assert_eq!(once, brl(16_000));
    assert_eq!(twice, brl(12_800));
    assert_ne!(twice, once);

    // Unit pricing starts from the catalog price, so a single-unit line
    // carries the single-application price.
    assert_eq!(unit_price(&line("foam", 20_000, 1)?, 1)?, once);

    Ok(())
}

#[test]
fn dropping_under_threshold_loses_wholesale() -> TestResult {
    let mut live = cart([line("foam", 20_000, 3)?, line("towel", 5_000, 2)?])?;

    assert_eq!(cart_totals(&live)?.total_savings, brl(11_200));

    live.decrement("towel")?;

    let totals = cart_totals(&live)?;

    assert_eq!(totals.total_items, 4);
    assert_eq!(totals.total_savings, brl(0));
    assert_eq!(totals.total_price, brl(52_000));

    Ok(())
}
