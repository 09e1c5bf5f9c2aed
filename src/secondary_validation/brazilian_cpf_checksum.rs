use crate::secondary_validation::{collect_digits, mod11_check_digit, Validator};

pub struct BrazilianCpfChecksum;

pub(crate) const BRAZILIAN_CPF_DIGIT_COUNT: usize = 11;

const FIRST_CHECK_WEIGHTS: &[u32; 9] = &[10, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_CHECK_WEIGHTS: &[u32; 10] = &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2];

impl Validator for BrazilianCpfChecksum {
    // https://pt.wikipedia.org/wiki/Cadastro_de_Pessoas_F%C3%ADsicas#C%C3%A1lculo_do_d%C3%ADgito_verificador
    fn is_valid(&self, input: &str) -> bool {
        let digits = collect_digits(input);
        if digits.len() != BRAZILIAN_CPF_DIGIT_COUNT {
            return false;
        }

        // 000.000.000-00, 111.111.111-11, ... pass the arithmetic but are never issued
        if digits.iter().all(|d| *d == digits[0]) {
            return false;
        }

        if mod11_check_digit(&digits[..9], FIRST_CHECK_WEIGHTS) != digits[9] {
            return false;
        }
        mod11_check_digit(&digits[..10], SECOND_CHECK_WEIGHTS) == digits[10]
    }
}
