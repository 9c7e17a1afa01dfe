pub const BASE_URL: &str = "https://www.nintendo.co.jp/";

pub fn status_path(culture_code: &str) -> String {
    format!("netinfo/{culture_code}/status.json")
}
