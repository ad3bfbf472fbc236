//! Summary prompts for seq2seq models (BART/T5 base).
//!
//! Each prompt is the record's facts laid out in one of several shapes; one is
//! picked at random per request.

use medlookup_core::MedicineRecord;
use rand::Rng;

/// Number of prompt layouts.
pub const PROMPT_VARIANT_COUNT: usize = 7;

/// Every prompt layout for a record, in a fixed order.
pub fn prompt_variants(item: &MedicineRecord) -> [String; PROMPT_VARIANT_COUNT] {
    let drug = &item.drug_name;
    let company = &item.company_name;
    let ingredient = &item.active_ingredient;
    let indication = &item.indication;
    let dosage = &item.dosage_and_administration;
    let side_effects = &item.side_effects;
    let pregnancy = &item.use_in_pregnancy;

    [
        format!(
            "{drug} is a medicine by {company} containing {ingredient}. \
             It is used for {indication}. Recommended dosage: {dosage}. \
             Possible side effects include {side_effects}. Use in pregnancy: {pregnancy}."
        ),
        format!(
            "Drug: {drug} | Company: {company} | Ingredient: {ingredient} | \
             Use: {indication} | Dosage: {dosage} | \
             Side Effects: {side_effects} | Pregnancy: {pregnancy}."
        ),
        format!(
            "{drug} ({ingredient}) — manufactured by {company}. \
             Indication: {indication}. Dosage: {dosage}. \
             Side Effects: {side_effects}. Pregnancy: {pregnancy}."
        ),
        format!(
            "Company: {company}\n\
             Active Ingredient: {ingredient}\n\
             Indication: {indication}\n\
             Dosage: {dosage}\n\
             Side Effects: {side_effects}\n\
             Use in pregnancy: {pregnancy}\n"
        ),
        format!(
            "{drug} is used for {indication}. \
             Contains {ingredient} and is produced by {company}. \
             Dosage: {dosage}. Side Effects: {side_effects}. \
             Pregnancy use: {pregnancy}."
        ),
        format!(
            "{drug} — made by {company} — contains {ingredient}. \
             Indicated for {indication}. Usual dose: {dosage}. \
             Side effects: {side_effects}. Pregnancy: {pregnancy}."
        ),
        format!(
            "{indication}. \
             Manufacturer: {company}. Ingredient: {ingredient}. \
             Dosage: {dosage}. Side effects: {side_effects}. \
             Pregnancy info: {pregnancy}."
        ),
    ]
}

/// One prompt layout chosen uniformly at random.
pub fn build_prompt<R: Rng + ?Sized>(item: &MedicineRecord, rng: &mut R) -> String {
    let index = rng.gen_range(0..PROMPT_VARIANT_COUNT);
    let mut variants = prompt_variants(item);
    std::mem::take(&mut variants[index])
}
