//! Keyword groups consulted by the qualification rules. Matching is by
//! substring, so short entries ("id", "app", "key") also hit longer words.
//! Several words appear in more than one group on purpose.

/// Food, drink and other perishable-adjacent terms.
pub const EXCLUDED: &[&str] = &[
    "food", "drink", "beverage", "water", "soda", "coffee", "tea", "juice", "milk", "beer", "wine",
    "alcohol", "sandwich", "burger", "pizza", "snack", "candy", "chocolate", "cookie", "cake",
    "bread", "fruit", "vegetable", "banana", "mango", "grape", "meal", "lunch", "leftover",
    "eaten", "tissue", "tissues", "napkin", "napkins", "paper", "toilet", "bottle", "plastic",
    "container", "cup", "mug", "disposable", "trash", "garbage", "waste", "perishable", "expired",
    "rotten", "moldy", "stale",
];

/// Low-cost disposables, rejected regardless of stated value.
///
/// "bag" is left out: as a substring it would reject every handbag and
/// backpack that the acceptable-object list admits.
pub const DISPOSABLE: &[&str] = &[
    "tissue", "tissues", "napkin", "napkins", "toilet", "paper", "plastic", "bottle", "cup",
    "container", "disposable", "wrapper", "packaging", "trash", "garbage",
];

/// Digital or virtual things that cannot be physically stored.
pub const NON_TANGIBLE: &[&str] = &[
    "digital", "virtual", "online", "software", "app", "data", "file", "memory", "cloud",
    "streaming", "download", "electronic", "email", "message",
];

/// Personal or movable objects the desk accepts.
pub const ACCEPTABLE: &[&str] = &[
    "handbag", "bag", "backpack", "purse", "tote", "satchel", "briefcase", "wallet", "money",
    "cash", "coins", "creditcard", "card", "id", "identification", "passport", "license", "phone",
    "cellphone", "mobile", "smartphone", "tablet", "laptop", "notebook", "computer", "device",
    "book", "textbook", "journal", "diary", "magazine", "newspaper", "document", "paper", "watch",
    "ring", "necklace", "bracelet", "earrings", "jewelry", "accessory", "glasses", "sunglasses",
    "keys", "key", "keychain", "remote", "camera", "charger", "cable", "headphones", "earbuds",
    "airpods", "clothing", "shirt", "pants", "jacket", "coat", "hat", "cap", "scarf", "gloves",
    "belt", "shoes", "boots",
];

/// Items important enough to keep whatever their estimated value.
pub const HIGH_VALUE: &[&str] = &[
    "passport", "license", "id", "identification", "credit", "card", "debit", "phone",
    "cellphone", "laptop", "tablet", "watch", "jewelry", "ring", "keys", "key", "wallet", "purse",
    "handbag", "backpack", "briefcase",
];
