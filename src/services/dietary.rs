//! Keyword-based dietary classification.
//!
//! Recipes are classified by display name only. A lower-cased name is tested
//! for substrings from curated keyword lists, so "Chicken Handi" is meat and
//! "Cheese Toastie" is dairy. Innocent names can hide meat ("Kedgeree") and
//! incidental substrings misfire ("Shamrock Shortbread" reads as ham); both
//! are tolerated.

use crate::models::{DietaryTag, Named};

/// Pure predicate over a lower-cased recipe name; `true` keeps the recipe
pub type NameRule = fn(&str) -> bool;

const MEAT_KEYWORDS: &[&str] = &[
    // Red meats
    "beef", "pork", "bacon", "ham", "sausage", "lamb", "mutton", "venison", "steak", "ribs",
    "brisket", "carnitas", "jerky", "salami", "pepperoni", "prosciutto", "chorizo", "hot dog",
    "burger", "meatball", "meat loaf", "veal", "rabbit", "goat",
    // Poultry
    "chicken", "turkey", "duck", "goose", "quail", "wings", "thigh", "breast", "drumstick",
    "nugget", "tender", "cutlet",
    // Fish and seafood
    "fish", "salmon", "tuna", "cod", "bass", "trout", "halibut", "mahi", "sole", "shrimp",
    "lobster", "crab", "scallop", "oyster", "mussel", "clam", "squid", "octopus", "anchovy",
    "sardine", "mackerel", "herring", "catfish", "tilapia", "grouper", "snapper", "flounder",
    "swordfish", "shark", "eel", "crawfish", "calamari", "crayfish", "prawns", "seafood",
    // Processed meats
    "deli meat", "lunch meat", "cold cuts", "pastrami", "mortadella", "bologna", "bratwurst",
    "kielbasa", "andouille", "pancetta", "guanciale",
    // General terms
    "meat", "protein", "bbq", "barbecue", "grilled", "roasted", "smoked", "pulled pork",
    "ground beef", "minced meat", "mince",
];

const ANIMAL_PRODUCT_KEYWORDS: &[&str] = &[
    "cheese", "milk", "butter", "cream", "yogurt", "egg", "honey", "mayo", "mayonnaise",
    "custard", "ice cream", "gelato",
];

const GLUTEN_KEYWORDS: &[&str] = &[
    "bread", "pasta", "noodle", "wheat", "flour", "pizza", "cake", "cookie", "pastry", "pie",
    "tart", "dumpling", "bagel",
];

const DAIRY_KEYWORDS: &[&str] = &[
    "cheese", "milk", "butter", "cream", "yogurt", "custard", "ice cream", "gelato", "parmesan",
    "mozzarella", "cheddar",
];

fn mentions_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| name.contains(keyword))
}

pub fn contains_meat(name: &str) -> bool {
    mentions_any(name, MEAT_KEYWORDS)
}

pub fn contains_animal_products(name: &str) -> bool {
    contains_meat(name) || mentions_any(name, ANIMAL_PRODUCT_KEYWORDS)
}

pub fn contains_gluten(name: &str) -> bool {
    mentions_any(name, GLUTEN_KEYWORDS)
}

pub fn contains_dairy(name: &str) -> bool {
    mentions_any(name, DAIRY_KEYWORDS)
}

fn meat_free(name: &str) -> bool {
    !contains_meat(name)
}

fn animal_free(name: &str) -> bool {
    !contains_animal_products(name)
}

fn gluten_free(name: &str) -> bool {
    !contains_gluten(name)
}

fn dairy_free(name: &str) -> bool {
    !contains_dairy(name)
}

/// Rule for a tag, or `None` when the tag imposes no name constraint
pub fn rule_for(tag: &DietaryTag) -> Option<NameRule> {
    match tag {
        DietaryTag::Vegetarian => Some(meat_free),
        DietaryTag::NonVegetarian => Some(contains_meat),
        DietaryTag::Vegan => Some(animal_free),
        DietaryTag::GlutenFree => Some(gluten_free),
        DietaryTag::DairyFree => Some(dairy_free),
        DietaryTag::Other(_) => None,
    }
}

/// True when the name passes every requested tag's rule
pub fn admits(name: &str, tags: &[DietaryTag]) -> bool {
    let name = name.to_lowercase();
    tags.iter()
        .filter_map(rule_for)
        .all(|rule| rule(&name))
}

/// Drops recipes whose names violate any requested tag.
///
/// Order-preserving and never adds records. Contradictory tags such as
/// vegetarian plus non-vegetarian leave nothing.
pub fn filter<T: Named>(recipes: Vec<T>, tags: &[DietaryTag]) -> Vec<T> {
    if tags.is_empty() {
        return recipes;
    }

    let before = recipes.len();
    let kept: Vec<T> = recipes
        .into_iter()
        .filter(|recipe| admits(recipe.name(), tags))
        .collect();

    tracing::debug!(
        before = before,
        after = kept.len(),
        tags = ?tags,
        "Dietary filter applied"
    );

    kept
}
