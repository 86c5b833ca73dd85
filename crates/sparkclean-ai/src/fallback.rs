//! Static fallback recommendations, keyed by language.
//!
//! Substituted wholesale when the model call fails, so callers always get a
//! non-empty list. English is the fallback for unsupported tags; matching is
//! on the primary subtag (`es-MX` → Spanish).

use sparkclean_core::model::{
    Category, Frequency, Priority, Recommendation, RecommendationSource,
};

fn rec(
    title: &str,
    description: &str,
    frequency: Frequency,
    category: Category,
    priority: Priority,
) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        description: Some(description.to_string()),
        frequency,
        category,
        priority,
        source: RecommendationSource::Fallback,
    }
}

/// The pre-authored list for a language tag. Never empty.
pub fn recommendations(language: &str) -> Vec<Recommendation> {
    match primary_subtag(language) {
        "es" => spanish(),
        "pt" => portuguese(),
        _ => english(),
    }
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or("")
}

fn english() -> Vec<Recommendation> {
    use Category::*;
    use Frequency::*;
    use Priority::*;
    vec![
        rec("Wipe kitchen counters", "Clear and wipe down all counters and the stovetop.", Daily, Kitchen, High),
        rec("Wash the dishes", "Empty the sink or run the dishwasher.", Daily, Kitchen, High),
        rec("Clean the bathroom", "Scrub the toilet, sink, and shower.", Weekly, Bathroom, High),
        rec("Vacuum common areas", "Vacuum floors and rugs in living spaces.", Weekly, LivingRoom, Medium),
        rec("Change bed linens", "Strip and wash sheets and pillowcases.", Weekly, Bedroom, Medium),
        rec("Do the laundry", "Wash, dry, and put away a full load.", Weekly, Laundry, Medium),
        rec("Clean the refrigerator", "Toss expired food and wipe the shelves.", Monthly, Kitchen, Low),
        rec("Dust shelves and surfaces", "Dust furniture, shelves, and electronics.", Monthly, General, Low),
        rec("Wash the windows", "Clean interior glass and window sills.", Yearly, Exterior, Low),
    ]
}

fn spanish() -> Vec<Recommendation> {
    use Category::*;
    use Frequency::*;
    use Priority::*;
    vec![
        rec("Limpiar las encimeras", "Despeja y limpia las encimeras y la estufa.", Daily, Kitchen, High),
        rec("Lavar los platos", "Vac\u{ed}a el fregadero o pon el lavavajillas.", Daily, Kitchen, High),
        rec("Limpiar el ba\u{f1}o", "Friega el inodoro, el lavabo y la ducha.", Weekly, Bathroom, High),
        rec("Aspirar las zonas comunes", "Aspira los suelos y alfombras de la sala.", Weekly, LivingRoom, Medium),
        rec("Cambiar la ropa de cama", "Quita y lava s\u{e1}banas y fundas.", Weekly, Bedroom, Medium),
        rec("Hacer la colada", "Lava, seca y guarda una carga completa.", Weekly, Laundry, Medium),
        rec("Limpiar el refrigerador", "Tira la comida caducada y limpia los estantes.", Monthly, Kitchen, Low),
        rec("Quitar el polvo", "Limpia el polvo de muebles y estanter\u{ed}as.", Monthly, General, Low),
        rec("Lavar las ventanas", "Limpia los cristales y los alf\u{e9}izares.", Yearly, Exterior, Low),
    ]
}

fn portuguese() -> Vec<Recommendation> {
    use Category::*;
    use Frequency::*;
    use Priority::*;
    vec![
        rec("Limpar as bancadas", "Limpe as bancadas da cozinha e o fog\u{e3}o.", Daily, Kitchen, High),
        rec("Lavar a lou\u{e7}a", "Esvazie a pia ou ligue a m\u{e1}quina de lavar lou\u{e7}a.", Daily, Kitchen, High),
        rec("Limpar o banheiro", "Esfregue o vaso, a pia e o chuveiro.", Weekly, Bathroom, High),
        rec("Aspirar as \u{e1}reas comuns", "Aspire pisos e tapetes da sala.", Weekly, LivingRoom, Medium),
        rec("Trocar a roupa de cama", "Retire e lave len\u{e7}\u{f3}is e fronhas.", Weekly, Bedroom, Medium),
        rec("Lavar a roupa", "Lave, seque e guarde uma carga completa.", Weekly, Laundry, Medium),
        rec("Limpar a geladeira", "Descarte alimentos vencidos e limpe as prateleiras.", Monthly, Kitchen, Low),
        rec("Tirar o p\u{f3}", "Limpe o p\u{f3} de m\u{f3}veis e prateleiras.", Monthly, General, Low),
        rec("Lavar as janelas", "Limpe os vidros e os peitoris.", Yearly, Exterior, Low),
    ]
}
