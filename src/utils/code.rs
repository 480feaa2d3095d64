use rand::distributions::Alphanumeric;
use rand::Rng;

pub const DELIVERY_CODE_LEN: usize = 6;

/// Generate a hand-off confirmation code: 6 uppercase alphanumeric chars.
/// Uniqueness across active deliveries is the store's job (unique column);
/// callers retry on collision.
pub fn generate_delivery_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DELIVERY_CODE_LEN)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect()
}

/// Shape check used to short-circuit validation before touching the store
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == DELIVERY_CODE_LEN && code.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_uppercase_alphanumerics() {
        for _ in 0..100 {
            let code = generate_delivery_code();
            assert_eq!(code.len(), DELIVERY_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
            assert!(is_well_formed_code(&code));
        }
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert!(!is_well_formed_code(""));
        assert!(!is_well_formed_code("AB12"));
        assert!(!is_well_formed_code("AB123456"));
        assert!(!is_well_formed_code("AB 12!"));
    }
}
