pub fn mask_api_key(key: &str) -> String {
    if key.len() > 5 {
        format!("{}{}", &key[..5], "*".repeat(key.len() - 5))
    } else {
        key.to_string()
    }
}
