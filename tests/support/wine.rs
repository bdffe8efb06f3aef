use std::path::Path;

/// Real rows from the UCI wine data, four per cultivar.
pub const WINE_SAMPLE_CSV: &str = "\
1,14.23,1.71,2.43,15.6,127,2.8,3.06,.28,2.29,5.64,1.04,3.92,1065
1,13.2,1.78,2.14,11.2,100,2.65,2.76,.26,1.28,4.38,1.05,3.4,1050
1,13.16,2.36,2.67,18.6,101,2.8,3.24,.3,2.81,5.68,1.03,3.17,1185
1,14.37,1.95,2.5,16.8,113,3.85,3.49,.24,2.18,7.8,.86,3.45,1480
2,12.37,.94,1.36,10.6,88,1.98,.57,.28,.42,1.95,1.05,1.82,520
2,12.33,1.1,2.28,16,101,2.05,1.09,.63,.41,3.27,1.25,1.67,680
2,12.64,1.36,2.02,16.8,100,2.02,1.41,.53,.62,5.75,.98,1.59,450
2,13.67,1.25,1.92,18,94,2.1,1.79,.32,.73,3.8,1.23,2.46,630

3,12.86,1.35,2.32,18,122,1.51,1.25,.21,.94,4.1,.76,1.29,630
3,12.88,2.99,2.4,20,104,1.3,1.22,.24,.83,5.4,.74,1.42,530
3,12.81,2.31,2.4,24,98,1.15,1.09,.27,.83,5.7,.66,1.36,560
3,12.7,3.55,2.36,21.5,106,1.7,1.2,.17,.84,5,.78,1.29,600
";

pub fn write_sample_csv(path: &Path) {
    std::fs::write(path, WINE_SAMPLE_CSV).expect("write sample csv");
}

/// Named-field request body for the first class 1 row.
pub fn class_one_request() -> serde_json::Value {
    serde_json::json!({
        "alcohol": 14.23,
        "malic_acid": 1.71,
        "ash": 2.43,
        "alcalinity_of_ash": 15.6,
        "magnesium": 127,
        "total_phenols": 2.8,
        "flavanoids": 3.06,
        "nonflavanoid_phenols": 0.28,
        "proanthocyanins": 2.29,
        "color_intensity": 5.64,
        "hue": 1.04,
        "od280": 3.92,
        "proline": 1065
    })
}

/// Same sample with every value as a string, the way the HTML form posts it.
pub fn class_two_form_request() -> serde_json::Value {
    serde_json::json!({
        "alcohol": "12.37",
        "malic_acid": "0.94",
        "ash": "1.36",
        "alcalinity_of_ash": "10.6",
        "magnesium": "88",
        "total_phenols": "1.98",
        "flavanoids": "0.57",
        "nonflavanoid_phenols": "0.28",
        "proanthocyanins": "0.42",
        "color_intensity": "1.95",
        "hue": "1.05",
        "od280": "1.82",
        "proline": "520"
    })
}
