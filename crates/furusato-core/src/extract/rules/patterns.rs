//! Regex patterns for donation certificate extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// The 47 prefectures, in JIS order.
pub const PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県",
    "静岡県", "愛知県", "三重県", "滋賀県", "京都府", "大阪府", "兵庫県",
    "奈良県", "和歌山県", "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

/// Era marker accepted in donation dates.
pub const REIWA: &str = "令和";

/// Era marker whose dates are always rejected.
pub const HEISEI: &str = "平成";

fn prefecture_alternation() -> String {
    PREFECTURES.join("|")
}

lazy_static! {
    // Amount: optional label, optional yen sign, digit run, 円
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(?:寄附金額|合計金額|金額|請求額|金)?\s*[¥￥]?\s*([\d,]+)\s*円"
    ).unwrap();

    // Prefecture followed by the shortest run up to 市/区/町/村
    pub static ref CITY_PATTERN: Regex = Regex::new(&format!(
        r"(?:{})\S*?(?:市|区|町|村)",
        prefecture_alternation()
    )).unwrap();

    pub static ref PREFECTURE_PREFIX: Regex = Regex::new(&format!(
        r"^(?:{})",
        prefecture_alternation()
    )).unwrap();

    pub static ref MUNICIPALITY_SUFFIX: Regex = Regex::new(
        r"(?:市|区|町|村)$"
    ).unwrap();

    // Year/month/[day] inside an NER date span, era marker not required
    pub static ref ERA_DATE_FRAGMENT: Regex = Regex::new(
        r"(\d+)年(\d+)月(\d+)?日?"
    ).unwrap();

    pub static ref REIWA_DATE: Regex = Regex::new(
        r"令和\s*(\d+)年(\d+)月(\d+)?日?"
    ).unwrap();

    static ref DECIMAL_DIGIT: Regex = Regex::new(r"^\p{Nd}$").unwrap();
}

/// Remove one leading prefecture name, if present.
pub fn strip_prefecture(name: &str) -> String {
    PREFECTURE_PREFIX.replace(name, "").into_owned()
}

/// Whether `text` contains `era`, optional whitespace, `year`, optional
/// whitespace, then 年.
pub fn era_year_mentioned(text: &str, era: &str, year: u32) -> bool {
    let pattern = format!(r"{}\s*{}\s*年", regex::escape(era), year);
    Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

fn is_decimal_digit(c: char) -> bool {
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Value of one decimal digit in any script.
///
/// Unicode encodes every decimal digit set as a contiguous 0..9 run, so the
/// value is the distance from the start of the run, modulo 10 for runs of
/// several sets back to back.
fn digit_value(c: char) -> Option<u32> {
    if let Some(digit) = c.to_digit(10) {
        return Some(digit);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut zero = c as u32;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        zero -= 1;
    }
    Some((c as u32 - zero) % 10)
}

/// Parse a run of decimal digits (ASCII, full-width or any other script).
pub fn parse_digits(digits: &str) -> Option<u32> {
    let mut value: u32 = 0;
    let mut seen = false;

    for c in digits.chars() {
        value = value.checked_mul(10)?.checked_add(digit_value(c)?)?;
        seen = true;
    }

    seen.then_some(value)
}
