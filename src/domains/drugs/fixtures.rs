//! Shared drug catalog used by unit tests.

use super::memory::InMemoryDrugStore;
use super::model::DrugRecord;

fn record(slug: &str, name: &str, generic: &str, manufacturer: &str) -> DrugRecord {
    DrugRecord {
        slug: slug.to_string(),
        drug_name: name.to_string(),
        generic_name: Some(generic.to_string()),
        manufacturer: Some(manufacturer.to_string()),
        set_id: Some(format!("set-{slug}")),
        title: Some(format!("{name} label")),
        ..Default::default()
    }
}

/// Five drugs; three share the "Bayer" manufacturer.
pub fn sample_records() -> Vec<DrugRecord> {
    let mut aspirin = record("aspirin-81", "Aspirin", "aspirin", "Bayer");
    aspirin.indications_and_usage = Some(format!(
        "<p>For the temporary relief of minor <b>pain</b>. {}</p>",
        "Take with water and food. ".repeat(20)
    ));
    aspirin.dosage_and_administration = Some("<p>1 tablet daily</p>".to_string());
    aspirin.dosage_forms_and_strengths = Some("<ul><li>81 mg tablet</li></ul>".to_string());
    aspirin.warnings = Some("<p>Reye's syndrome</p>".to_string());
    aspirin.adverse_reactions = Some("<p>Stomach bleeding</p>".to_string());
    aspirin.clinical_pharmacology = Some("<p>COX inhibitor</p>".to_string());

    let mut aspirin_325 = record(
        "aspirin-325",
        "Aspirin Extra Strength",
        "aspirin",
        "Bayer",
    );
    aspirin_325.indications_and_usage = Some("<p>Relieves headache pain</p>".to_string());

    let mut ibuprofen = record("ibuprofen", "Ibuprofen", "ibuprofen", "Bayer");
    ibuprofen.indications_and_usage = Some("<p>Reduces fever and inflammation</p>".to_string());

    let mut clopidogrel = record(
        "clopidogrel",
        "Plavix",
        "clopidogrel bisulfate",
        "Bristol-Myers Squibb",
    );
    clopidogrel.indications_and_usage =
        Some("<p>Used in combination with aspirin after a heart attack</p>".to_string());

    let mut metformin = record("metformin", "Metformin", "metformin hydrochloride", "Merck");
    metformin.indications_and_usage = Some("<p>Type 2 diabetes mellitus</p>".to_string());
    metformin.contraindications = Some("<p>Severe renal impairment</p>".to_string());
    metformin.warnings = Some("<p>Lactic acidosis</p>".to_string());

    vec![aspirin, aspirin_325, ibuprofen, clopidogrel, metformin]
}

pub fn sample_store() -> InMemoryDrugStore {
    InMemoryDrugStore::new(sample_records())
}
