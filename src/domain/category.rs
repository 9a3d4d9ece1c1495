use crate::config::LabelLanguage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryLabel {
    pub key: &'static str,
    pub chinese: &'static str,
    pub english: &'static str,
}

pub const CATEGORIES: [CategoryLabel; 8] = [
    CategoryLabel { key: "social_activities", chinese: "社交活动", english: "Social Activities" },
    CategoryLabel { key: "pets", chinese: "宠物萌照", english: "Pet Photos" },
    CategoryLabel { key: "single_person", chinese: "单人照片", english: "Single Person Photos" },
    CategoryLabel { key: "foods", chinese: "美食记录", english: "Food Records" },
    CategoryLabel { key: "travel_scenery", chinese: "旅行风景", english: "Travel Scenery" },
    CategoryLabel { key: "screenshot", chinese: "手机截图", english: "Mobile Screenshots" },
    CategoryLabel { key: "idcard", chinese: "证件照", english: "ID Card" },
    CategoryLabel { key: "other", chinese: "其它", english: "Other Images" },
];

#[must_use]
pub fn lookup(key: &str) -> Option<&'static CategoryLabel> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// Display label for a category key; unknown keys display as themselves.
#[must_use]
pub fn display_label(key: &str, language: LabelLanguage) -> String {
    lookup(key).map_or_else(
        || key.to_string(),
        |label| match language {
            LabelLanguage::Chinese => label.chinese.to_string(),
            LabelLanguage::English => label.english.to_string(),
        },
    )
}
