use afl::fuzz;
use gift_registry_core::{
    format_tax_id, is_valid_date_in_year, normalize_slug, parse_amount, read_amount, split,
    strip_formatting, to_display_form, to_machine_form, validate_tax_id, TaxId,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_decimal::Decimal;

#[cfg(not(feature = "manual_test"))]
fn main() {
    fuzz!(|data: &[u8]| {
        run_raw_fuzz(data);
    });
}

#[cfg(feature = "manual_test")]
fn main() {
    use std::io::{stdin, Read};

    let mut input = vec![];
    stdin().read_to_end(&mut input).unwrap();
    run_raw_fuzz(&input);
}

fn split_bytes_once(input: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(i) = input.iter().position(|b| *b == b',') {
        Some((&input[0..i], &input[i + 1..]))
    } else {
        None
    }
}

fn run_raw_fuzz(bytes: &[u8]) -> Option<()> {
    let (input, rand_seed) = split_bytes_once(bytes)?;
    let input_str = std::str::from_utf8(input).ok()?;

    let mut rng_seed: u64 = 0;
    for i in 0..8 {
        if rand_seed.len() > i {
            rng_seed <<= 8;
            rng_seed += rand_seed[i] as u64;
        }
    }

    let rng = StdRng::seed_from_u64(rng_seed);
    run_fuzz(input_str, rng);

    Some(())
}

fn run_fuzz(input: &str, mut rng: StdRng) {
    #[cfg(feature = "manual_test")]
    {
        println!("Input: {:?}", input);
    }

    // Tax ids: total, and consistent with the typed wrapper and the mask
    let valid_tax_id = validate_tax_id(input);
    assert_eq!(valid_tax_id, input.parse::<TaxId>().is_ok());
    assert_eq!(validate_tax_id(&format_tax_id(input)), {
        let digits = strip_formatting(input);
        digits.len() >= 11 && validate_tax_id(&digits[..11])
    });

    // Dates: every valid display date survives the round trip
    let current_year = rng.gen_range(1900..=2100);
    if is_valid_date_in_year(input, current_year) {
        let machine = to_machine_form(input).expect("valid dates convert");
        assert_eq!(to_display_form(&machine).as_deref(), Ok(input));
    } else {
        // must not panic, whatever the outcome
        let _ = to_machine_form(input);
    }
    let _ = to_display_form(input);

    // Quotas: always add up to the amount in cents
    let amount = parse_amount(input);
    assert_eq!(amount, read_amount(input).unwrap_or(Decimal::ZERO));
    let count = rng.gen_range(-10..=150);
    let quotas = split(amount, count);
    assert!((1..=100).contains(&quotas.count()));
    if amount <= Decimal::ZERO {
        assert_eq!(quotas.total_cents(), 0);
    } else {
        assert!(quotas.last_cents() >= quotas.base_cents());
        assert!(quotas.last_cents() - quotas.base_cents() < i64::from(quotas.count()));
    }

    // Slugs: already normalized text is left alone
    let slug = normalize_slug(input);
    assert_eq!(normalize_slug(&slug), slug);

    #[cfg(feature = "manual_test")]
    {
        println!("Tax id valid: {:?}", valid_tax_id);
        println!("Quotas: {:?}", quotas);
    }
}
