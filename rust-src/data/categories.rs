//! Fixed municipality groupings used by the category commands.

/// Aggregate rows in the source data that are not municipalities.
pub const EXCLUDED_KEYS: [&str; 4] = ["町村部", "郡部", "群部", "島部"];

const WARDS_23: [&str; 23] = [
    "千代田区", "中央区", "港区", "新宿区", "渋谷区", "目黒区", "大田区", "品川区",
    "世田谷区", "中野区", "杉並区", "豊島区", "北区", "荒川区", "台東区", "墨田区",
    "江東区", "江戸川区", "葛飾区", "板橋区", "練馬区", "足立区", "文京区",
];

const TAMA: [&str; 26] = [
    "八王子市", "立川市", "武蔵野市", "三鷹市", "青梅市", "府中市", "昭島市", "調布市",
    "町田市", "小金井市", "小平市", "日野市", "東村山市", "国分寺市", "国立市", "福生市",
    "狛江市", "東大和市", "清瀬市", "東久留米市", "武蔵村山市", "多摩市", "稲城市",
    "羽村市", "あきる野市", "瑞穂町",
];

const ISLANDS: [&str; 6] = [
    "日の出町", "奥多摩町", "大島支庁", "八丈支庁", "三宅支庁", "小笠原支庁",
];


/// A named group of municipalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Wards23,
    Tama,
    Islands,
}


impl Category {
    pub const ALL: [Category; 3] = [Category::Wards23, Category::Tama, Category::Islands];

    /// Member names, in display order.
    pub fn members(self) -> &'static [&'static str] {
        match self {
            Category::Wards23 => &WARDS_23,
            Category::Tama => &TAMA,
            Category::Islands => &ISLANDS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Wards23 => "23区",
            Category::Tama => "多摩地域",
            Category::Islands => "島しょ・西多摩",
        }
    }

    /// Find the category a municipality belongs to, if any.
    pub fn of(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.members().contains(&name))
    }

    /// Parse the short names accepted on the command line.
    pub fn from_arg(arg: &str) -> Option<Category> {
        match arg {
            "23" | "wards" => Some(Category::Wards23),
            "tama" => Some(Category::Tama),
            "islands" => Some(Category::Islands),
            _ => None,
        }
    }
}


/// Whether a top-level key names an aggregate row rather than a municipality.
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_KEYS.contains(&name)
}
