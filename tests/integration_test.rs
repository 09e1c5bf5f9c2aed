use gift_registry_core::{
    is_valid_date_in_year, normalize_slug, split, strip_formatting, to_display_form,
    to_machine_form, validate_tax_id, BrazilianCpfChecksum, CalendarDateChecker, Gift,
    GiftDraft, GiftValidationError, GiftValidator, ListDraft, ListProgress, ListValidator,
    RegistrationForm, RegistrationValidator, SessionContext, User, ValidationConfig, Validator,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn tax_id_requires_exactly_eleven_digits() {
    let source = "5299822472552998224725";
    for len in 0..=source.len() {
        let candidate = &source[..len];
        if len != 11 {
            assert!(!validate_tax_id(candidate), "{candidate} should be invalid");
        }
    }
    assert!(validate_tax_id(&source[..11]));
}

#[test]
fn tax_id_with_identical_digits_is_invalid() {
    for digit in '0'..='9' {
        let id: String = std::iter::repeat(digit).take(11).collect();
        assert!(!validate_tax_id(&id));
    }
}

#[test]
fn tax_id_known_valid_example() {
    assert!(validate_tax_id("52998224725"));
    assert!(validate_tax_id("529.982.247-25"));
    assert_eq!(strip_formatting("529.982.247-25"), "52998224725");
}

#[test]
fn validators_are_usable_as_trait_objects() {
    let validators: Vec<(Box<dyn Validator>, &str, &str)> = vec![
        (Box::new(BrazilianCpfChecksum), "529.982.247-25", "529.982.247-52"),
        (
            Box::new(CalendarDateChecker::new(2024)),
            "29/02/2024",
            "29/02/2023",
        ),
    ];
    for (validator, valid, invalid) in validators {
        assert!(validator.is_valid(valid));
        assert!(!validator.is_valid(invalid));
    }
}

#[test]
fn calendar_date_examples() {
    for invalid in ["31/02/2024", "00/01/2020", "01/13/2020", "29/02/2023"] {
        assert!(!is_valid_date_in_year(invalid, 2024), "{invalid}");
    }
    assert!(is_valid_date_in_year("29/02/2024", 2024));
}

#[test]
fn display_dates_round_trip() {
    for display in ["01/01/1900", "29/02/2000", "31/12/1999", "15/06/2024"] {
        assert!(is_valid_date_in_year(display, 2024));
        let machine = to_machine_form(display).unwrap();
        assert_eq!(to_display_form(&machine).unwrap(), display);
    }
}

#[test]
fn quota_split_examples() {
    let quotas = split(dec!(100.00), 3);
    assert_eq!((quotas.base(), quotas.last()), (dec!(33.33), dec!(33.34)));
    assert!(quotas.has_remainder());
    assert_eq!(quotas.base() * Decimal::TWO + quotas.last(), dec!(100.00));

    let quotas = split(dec!(90.00), 3);
    assert_eq!((quotas.base(), quotas.last()), (dec!(30.00), dec!(30.00)));
    assert!(!quotas.has_remainder());

    let quotas = split(Decimal::ZERO, 5);
    assert_eq!((quotas.base(), quotas.last()), (Decimal::ZERO, Decimal::ZERO));
    assert!(!quotas.has_remainder());

    assert_eq!(split(dec!(50.00), 0), split(dec!(50.00), 1));
}

#[test]
fn signed_in_registration_flow() {
    let validator = RegistrationValidator::new(&ValidationConfig::new().current_year(2024));
    let form = RegistrationForm {
        name: "João Lima".to_string(),
        email: "joao@example.com".to_string(),
        cpf: "012.345.678-90".to_string(),
        birth_date: "05/11/1990".to_string(),
        password: "123456".to_string(),
        confirm_password: "123456".to_string(),
    };
    let request = validator.validate(&form).unwrap();
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["cpf"], "01234567890");
    assert_eq!(body["birthDate"], "1990-11-05T00:00:00.000Z");

    let mut context = SessionContext::new();
    context
        .sign_in(
            "token-1".to_string(),
            User {
                id: "u-9".to_string(),
                name: Some(request.name.clone()),
                email: request.email.clone(),
            },
        )
        .unwrap();
    assert_eq!(
        context.authorization_header().as_deref(),
        Some("Bearer token-1")
    );
}

#[test]
fn list_and_gift_forms() {
    let list = ListValidator::new()
        .validate(&ListDraft {
            title: "Chá de Casa Nova".to_string(),
            slug: "Casa Nova da Bia".to_string(),
            event_type: "CHA_CASA_NOVA".to_string(),
            ..ListDraft::default()
        })
        .unwrap();
    assert_eq!(list.slug, normalize_slug("casa nova da bia"));

    let validator = GiftValidator::new(&ValidationConfig::default());
    assert_eq!(
        validator.validate(&GiftDraft::default()).unwrap_err(),
        GiftValidationError::NameRequired
    );
    let gift = GiftDraft {
        name: "Geladeira".to_string(),
        price: "3.5e3".to_string(),
        quota_count: 7,
        ..GiftDraft::default()
    };
    assert_eq!(validator.validate(&gift).unwrap().price, dec!(3500));
    assert_eq!(validator.preview(&gift).last(), dec!(500.00));

    let gifts: Vec<Gift> = serde_json::from_str(
        r#"[{"id": "1", "name": "Geladeira", "price": 3500, "status": "PURCHASED"}]"#,
    )
    .unwrap();
    assert_eq!(ListProgress::from_gifts(&gifts).raised, dec!(3500));
}
