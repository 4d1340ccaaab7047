//! Static petition category registry: one instructional system prompt and
//! the list of required case-data fields per category.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetitionCategory {
    Traffic,
    Rental,
    ConsumerComplaint,
    LaborComplaint,
    DivorcePetition,
    InheritancePetition,
}

impl PetitionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetitionCategory::Traffic => "traffic",
            PetitionCategory::Rental => "rental",
            PetitionCategory::ConsumerComplaint => "consumer_complaint",
            PetitionCategory::LaborComplaint => "labor_complaint",
            PetitionCategory::DivorcePetition => "divorce_petition",
            PetitionCategory::InheritancePetition => "inheritance_petition",
        }
    }

    /// Human-readable Turkish description used inside the prompt.
    pub fn description(&self) -> &'static str {
        match self {
            PetitionCategory::Traffic => "Trafik Cezası İtiraz Dilekçesi",
            PetitionCategory::Rental => "Kira Artış Oranı İtiraz Dilekçesi",
            PetitionCategory::ConsumerComplaint => "Tüketici Şikayet Dilekçesi",
            PetitionCategory::LaborComplaint => "İş Hukuku Şikayet Dilekçesi",
            PetitionCategory::DivorcePetition => "Boşanma Dilekçesi",
            PetitionCategory::InheritancePetition => "Miras Hukuku Dilekçesi",
        }
    }
}

/// Fixed prompt skeleton and required-field list for one category.
/// Loaded at process start, never persisted.
#[derive(Debug)]
pub struct CategoryTemplate {
    pub system_prompt: &'static str,
    pub required_fields: &'static [&'static str],
}

pub const REQUIRED_CASE_FIELDS: &[&str] =
    &["full_name", "id_number", "incident_date", "incident_details"];

static TRAFFIC_TEMPLATE: CategoryTemplate = CategoryTemplate {
    system_prompt: "Sen deneyimli bir trafik hukuku avukatısın. Trafik cezası itiraz dilekçesi hazırlayacaksın.

Dilekçede şu noktalara dikkat et:
1. 2918 sayılı Karayolları Trafik Kanunu ve ilgili mevzuatı kullan
2. İtiraz gerekçelerini somut olaylara dayandır
3. Varsa içtihatlardan örnekler ver
4. Resmi dilekçe formatını kullan (tarih, başlık, hitap, ilgi, konu, sonuç ve talep)
5. Profesyonel ve saygılı bir dil kullan

Dilekçeyi Türkçe hazırla ve gerçek bir hukuki belge formatında olsun.",
    required_fields: REQUIRED_CASE_FIELDS,
};

static RENTAL_TEMPLATE: CategoryTemplate = CategoryTemplate {
    system_prompt: "Sen deneyimli bir kira hukuku avukatısın. Kira artış oranı itiraz dilekçesi hazırlayacaksın.

Dilekçede şu noktalara dikkat et:
1. 6098 sayılı Türk Borçlar Kanunu'nun 344. maddesini referans al
2. TÜFE artış oranlarını belirt
3. Yargıtay içtihatlarından örnekler ver
4. Resmi dilekçe formatını kullan (tarih, başlık, hitap, ilgi, konu, sonuç ve talep)
5. Profesyonel ve saygılı bir dil kullan

Dilekçeyi Türkçe hazırla ve gerçek bir hukuki belge formatında olsun.",
    required_fields: REQUIRED_CASE_FIELDS,
};

// Categories without a dedicated skeleton fall back to this instead of failing.
static GENERIC_TEMPLATE: CategoryTemplate = CategoryTemplate {
    system_prompt: "Sen profesyonel bir hukuk asistanısın. Türk hukuk sistemine uygun resmi dilekçeler hazırlıyorsun.

Dilekçede şu noktalara dikkat et:
1. İlgili mevzuata atıf yap
2. Resmi dilekçe formatını kullan (tarih, başlık, hitap, ilgi, konu, sonuç ve talep)
3. Profesyonel ve saygılı bir dil kullan

Dilekçeyi Türkçe hazırla ve gerçek bir hukuki belge formatında olsun.",
    required_fields: REQUIRED_CASE_FIELDS,
};

/// Look up the template for a category, falling back to the generic skeleton.
pub fn template_for(category: PetitionCategory) -> &'static CategoryTemplate {
    match category {
        PetitionCategory::Traffic => &TRAFFIC_TEMPLATE,
        PetitionCategory::Rental => &RENTAL_TEMPLATE,
        _ => &GENERIC_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[PetitionCategory] = &[
        PetitionCategory::Traffic,
        PetitionCategory::Rental,
        PetitionCategory::ConsumerComplaint,
        PetitionCategory::LaborComplaint,
        PetitionCategory::DivorcePetition,
        PetitionCategory::InheritancePetition,
    ];

    #[test]
    fn every_category_has_description_and_template() {
        for category in ALL {
            assert!(!category.description().is_empty());
            let template = template_for(*category);
            assert!(!template.system_prompt.is_empty());
            assert_eq!(template.required_fields, REQUIRED_CASE_FIELDS);
        }
    }

    #[test]
    fn dedicated_templates_are_category_specific() {
        assert!(template_for(PetitionCategory::Traffic)
            .system_prompt
            .contains("2918"));
        assert!(template_for(PetitionCategory::Rental)
            .system_prompt
            .contains("6098"));
    }

    #[test]
    fn unmapped_categories_fall_back_to_generic() {
        let template = template_for(PetitionCategory::DivorcePetition);
        assert!(template.system_prompt.contains("hukuk asistanısın"));
    }

    #[test]
    fn wire_form_is_snake_case() {
        let json = serde_json::to_string(&PetitionCategory::Traffic).unwrap();
        assert_eq!(json, "\"traffic\"");
        let parsed: PetitionCategory = serde_json::from_str("\"consumer_complaint\"").unwrap();
        assert_eq!(parsed, PetitionCategory::ConsumerComplaint);
    }

    #[test]
    fn unknown_category_is_rejected_at_the_wire() {
        assert!(serde_json::from_str::<PetitionCategory>("\"tax_appeal\"").is_err());
    }
}
