//! Built-in taxonomies.
//!
//! Both tables are reproduced keyword for keyword, duplicates included, so
//! that re-tagging existing data yields the same assignments.

use super::{Taxonomy, ThemeRule};

fn rule(name: &str, keywords: &[&str]) -> ThemeRule {
    ThemeRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// Twenty compound themes. The default taxonomy.
pub fn standard() -> Taxonomy {
    Taxonomy {
        name: "standard".to_string(),
        version: "2".to_string(),
        themes: vec![
            rule(
                "Grace & Gospel",
                &[
                    "grace",
                    "gospel",
                    "righteousness",
                    "forgiveness",
                    "mercy",
                    "love",
                    "compassion",
                    "covenant",
                    "blessing",
                    "favor",
                    "finished",
                    "work",
                    "cross",
                    "blood",
                    "gift",
                    "established",
                    "assurance",
                    "self",
                    "righteousness",
                ],
            ),
            rule(
                "Anointing & Power",
                &[
                    "anointing",
                    "anointed",
                    "power",
                    "supernatural",
                    "miracles",
                    "manifestation",
                    "glory",
                    "presence",
                    "heaven",
                    "divine",
                    "increasing",
                    "greater",
                    "fire",
                    "awesome",
                    "single",
                    "out",
                    "crowd",
                ],
            ),
            rule(
                "Holy Spirit",
                &[
                    "spirit",
                    "holy",
                    "tongues",
                    "manifestation",
                    "presence",
                    "glory",
                    "cloud",
                    "moving",
                    "living",
                    "person",
                    "comfort",
                    "joy",
                    "manifests",
                    "visits",
                    "angels",
                    "service",
                ],
            ),
            rule(
                "Faith & Trust",
                &[
                    "faith",
                    "believe",
                    "trust",
                    "confidence",
                    "assurance",
                    "certainty",
                    "promises",
                    "inheritance",
                    "blessings",
                    "miracles",
                    "supernatural",
                    "important",
                    "why",
                    "effortless",
                    "enjoys",
                ],
            ),
            rule(
                "Worship & Praise",
                &[
                    "worship",
                    "praise",
                    "glory",
                    "presence",
                    "throne",
                    "room",
                    "attracts",
                    "manifestation",
                    "humility",
                    "ultimate",
                    "blessings",
                    "lives",
                    "god",
                ],
            ),
            rule(
                "Healing & Miracles",
                &[
                    "healing",
                    "heal",
                    "sick",
                    "miracle",
                    "miracles",
                    "power",
                    "supernatural",
                    "compassion",
                    "forgiveness",
                    "twin",
                    "remembering",
                    "will",
                    "all",
                    "holds",
                    "back",
                    "greater",
                    "after",
                    "jesus",
                    "went",
                    "heaven",
                ],
            ),
            rule(
                "Kingdom & Authority",
                &[
                    "kingdom",
                    "reign",
                    "authority",
                    "power",
                    "government",
                    "shoulders",
                    "heaven",
                    "earth",
                    "colonising",
                    "kiss",
                    "positioning",
                    "yourself",
                    "speed",
                    "up",
                    "supernatural",
                    "lightning",
                    "conductor",
                ],
            ),
            rule(
                "Freedom & Liberation",
                &[
                    "freedom",
                    "free",
                    "liberated",
                    "liberty",
                    "orphan",
                    "spirit",
                    "masks",
                    "religious",
                    "political",
                    "control",
                    "overthrowing",
                    "condemnation",
                    "guilt",
                    "fully",
                    "covered",
                    "glory",
                ],
            ),
            rule(
                "Spiritual Warfare",
                &[
                    "warfare",
                    "enemy",
                    "outwit",
                    "accusation",
                    "spirit",
                    "religious",
                    "political",
                    "control",
                    "overthrowing",
                    "struggle",
                    "authentic",
                    "tactics",
                    "trick",
                    "unbelief",
                ],
            ),
            rule(
                "Fear & Courage",
                &[
                    "fear",
                    "fearless",
                    "courage",
                    "bold",
                    "living",
                    "times",
                    "judgement",
                    "wrath",
                    "condemnation",
                    "guilt",
                    "totally",
                    "free",
                    "from",
                ],
            ),
            rule(
                "Word & Truth",
                &[
                    "word",
                    "scripture",
                    "bible",
                    "truth",
                    "knowledge",
                    "key",
                    "restoring",
                    "gospel",
                    "grace",
                    "law",
                    "foundation",
                    "discerning",
                    "legalism",
                ],
            ),
            rule(
                "Peace & Rest",
                &[
                    "peace",
                    "rest",
                    "comfort",
                    "covenant",
                    "shadow",
                    "living",
                    "under",
                    "god",
                    "anointing",
                    "brings",
                    "stress",
                    "free",
                    "near",
                    "to",
                ],
            ),
            rule(
                "Prayer & Intercession",
                &[
                    "prayer",
                    "pray",
                    "intercession",
                    "tongues",
                    "power",
                    "equipping",
                    "incredible",
                    "speaking",
                    "wisdom",
                    "true",
                ],
            ),
            rule(
                "Identity & Sonship",
                &[
                    "identity",
                    "sonship",
                    "christ",
                    "inheritance",
                    "gift",
                    "righteousness",
                    "established",
                    "secure",
                    "christianity",
                    "believable",
                    "workmanship",
                    "created",
                    "christ",
                ],
            ),
            rule(
                "Joy & Happiness",
                &[
                    "joy",
                    "rejoice",
                    "happiness",
                    "gladness",
                    "wonderful",
                    "thoughts",
                    "inspired",
                    "imagination",
                    "first",
                    "love",
                    "god",
                    "things",
                    "steal",
                    "our",
                ],
            ),
            rule(
                "Church & Ministry",
                &[
                    "church",
                    "congregation",
                    "ministry",
                    "pastor",
                    "delivering",
                    "people",
                    "cultures",
                    "effective",
                    "winning",
                    "lost",
                    "bringers",
                    "wonderful",
                ],
            ),
            rule(
                "Christmas & Easter",
                &[
                    "christmas",
                    "emmanuel",
                    "nativity",
                    "resurrection",
                    "cross",
                    "crucifixion",
                    "easter",
                    "prophetic",
                    "message",
                    "just",
                    "about",
                    "day",
                ],
            ),
            rule(
                "End Times & Prophecy",
                &[
                    "end",
                    "times",
                    "prophecy",
                    "revelation",
                    "apocalypse",
                    "elijah",
                    "urgency",
                    "anointing",
                    "prophetic",
                    "alignment",
                ],
            ),
            rule(
                "Discipleship & Growth",
                &[
                    "discipleship",
                    "growth",
                    "maturity",
                    "congregational",
                    "signs",
                    "building",
                    "culture",
                    "presence",
                    "increasing",
                    "anointing",
                ],
            ),
            rule(
                "Testimonies & Reports",
                &[
                    "testimonies",
                    "reports",
                    "europe",
                    "ministry",
                    "trip",
                    "south",
                    "africa",
                    "grand",
                    "opening",
                    "session",
                    "qa",
                ],
            ),
        ],
    }
}

/// The first-generation table of nineteen single-word themes.
pub fn legacy() -> Taxonomy {
    Taxonomy {
        name: "legacy".to_string(),
        version: "1".to_string(),
        themes: vec![
            rule(
                "Grace",
                &["grace", "gospel", "righteousness", "forgiveness", "mercy"],
            ),
            rule("Faith", &["faith", "believe", "trust", "confidence"]),
            rule(
                "Anointing",
                &["anointing", "anointed", "power", "supernatural"],
            ),
            rule(
                "Holy Spirit",
                &["holy spirit", "spirit", "tongues", "manifestation"],
            ),
            rule(
                "Healing",
                &["healing", "heal", "sick", "miracle", "miracles"],
            ),
            rule("Worship", &["worship", "praise", "glory", "presence"]),
            rule(
                "Identity",
                &["identity", "sonship", "christ", "inheritance"],
            ),
            rule("Fear", &["fear", "fearless", "courage", "bold"]),
            rule("Love", &["love", "compassion", "relationship"]),
            rule("Kingdom", &["kingdom", "reign", "authority", "power"]),
            rule("Freedom", &["freedom", "free", "liberated", "liberty"]),
            rule("Joy", &["joy", "rejoice", "happiness", "gladness"]),
            rule("Peace", &["peace", "rest", "comfort"]),
            rule("Prayer", &["prayer", "pray", "intercession"]),
            rule("Word", &["word", "scripture", "bible", "truth"]),
            rule("Church", &["church", "congregation", "ministry", "pastor"]),
            rule("Christmas", &["christmas", "emmanuel", "nativity"]),
            rule("Easter", &["resurrection", "cross", "crucifixion"]),
            rule(
                "End Times",
                &["end times", "prophecy", "revelation", "apocalypse"],
            ),
        ],
    }
}

/// Look up a preset by name.
pub fn by_name(name: &str) -> Option<Taxonomy> {
    match name.trim().to_lowercase().as_str() {
        "standard" => Some(standard()),
        "legacy" => Some(legacy()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_pass_validation() {
        assert!(standard().validated().is_ok());
        assert!(legacy().validated().is_ok());
    }

    #[test]
    fn test_preset_sizes() {
        assert_eq!(standard().themes.len(), 20);
        assert_eq!(legacy().themes.len(), 19);
    }

    #[test]
    fn test_standard_order() {
        let taxonomy = standard();
        let names = taxonomy.theme_names();
        assert_eq!(names[0], "Grace & Gospel");
        assert_eq!(names[5], "Healing & Miracles");
        assert_eq!(names[19], "Testimonies & Reports");
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("Legacy").map(|t| t.name), Some("legacy".to_string()));
        assert!(by_name("v3").is_none());
    }
}
