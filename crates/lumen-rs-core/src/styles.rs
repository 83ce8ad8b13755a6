//! Built-in style presets appended to user prompts.

use serde::Serialize;

/// Read-only style metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    /// Stable identifier stored on records and settings.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    pub description: &'static str,
    /// Fragment appended to the user prompt.
    pub prompt_modifier: &'static str,
    /// Sample prompt showing the style.
    pub example: &'static str,
}

impl StylePreset {
    /// Apply this preset's modifier to a prompt.
    pub fn apply(&self, prompt: &str) -> String {
        if self.prompt_modifier.is_empty() {
            prompt.to_string()
        } else {
            format!("{prompt}, {}", self.prompt_modifier)
        }
    }
}

/// Catalog in declaration order; the first entry is the default.
static CATALOG: [StylePreset; 8] = [
    StylePreset {
        id: "photorealistic",
        name: "Photorealistic",
        description: "Realistic photography style with natural lighting",
        prompt_modifier: "photorealistic, high quality, professional photography, natural lighting, detailed",
        example: "A photorealistic portrait of a person in natural lighting",
    },
    StylePreset {
        id: "artistic",
        name: "Artistic Painting",
        description: "Oil painting or watercolor artistic style",
        prompt_modifier: "artistic painting, oil painting style, painterly, brushstrokes, canvas texture",
        example: "An artistic oil painting of a landscape with visible brushstrokes",
    },
    StylePreset {
        id: "digital_art",
        name: "Digital Art",
        description: "Modern digital artwork with vibrant colors",
        prompt_modifier: "digital art, concept art, vibrant colors, digital painting, highly detailed",
        example: "Digital concept art of a futuristic city with vibrant neon lights",
    },
    StylePreset {
        id: "fantasy",
        name: "Fantasy",
        description: "Magical and fantastical scenes",
        prompt_modifier: "fantasy art, magical, mystical, ethereal lighting, enchanted, dreamlike",
        example: "A magical forest with glowing mushrooms and fairy lights",
    },
    StylePreset {
        id: "sci_fi",
        name: "Sci-Fi",
        description: "Futuristic and science fiction themes",
        prompt_modifier: "sci-fi, futuristic, cyberpunk, neon lighting, high-tech, space age",
        example: "A futuristic cyberpunk cityscape with neon lights and flying cars",
    },
    StylePreset {
        id: "minimalist",
        name: "Minimalist",
        description: "Clean, simple designs with minimal elements",
        prompt_modifier: "minimalist, clean design, simple, geometric, modern, white background",
        example: "A minimalist geometric composition with clean lines and simple shapes",
    },
    StylePreset {
        id: "vintage",
        name: "Vintage",
        description: "Retro and vintage aesthetic",
        prompt_modifier: "vintage, retro, aged, film photography, nostalgic, classic style",
        example: "A vintage-style photograph with aged colors and retro aesthetic",
    },
    StylePreset {
        id: "abstract",
        name: "Abstract",
        description: "Non-representational artistic expression",
        prompt_modifier: "abstract art, non-representational, flowing forms, color study, experimental",
        example: "An abstract composition with flowing colors and dynamic forms",
    },
];

/// Find a preset by id.
pub fn lookup(id: &str) -> Option<&'static StylePreset> {
    CATALOG.iter().find(|preset| preset.id == id)
}

/// All presets in catalog order.
pub fn list_all() -> &'static [StylePreset] {
    &CATALOG
}

/// The default preset.
pub fn default_style() -> &'static StylePreset {
    &CATALOG[0]
}

/// Build the prompt sent to the model: the user prompt plus the style
/// modifier when `style` resolves.
pub fn final_prompt(prompt: &str, style: Option<&str>) -> String {
    match style.and_then(lookup) {
        Some(preset) => preset.apply(prompt),
        None => prompt.to_string(),
    }
}

/// Recover the user prompt from a final prompt built with `style`.
pub fn strip_modifier<'a>(prompt: &'a str, style: Option<&str>) -> &'a str {
    style
        .and_then(lookup)
        .filter(|preset| !preset.prompt_modifier.is_empty())
        .and_then(|preset| {
            prompt
                .strip_suffix(preset.prompt_modifier)
                .and_then(|rest| rest.strip_suffix(", "))
        })
        .unwrap_or(prompt)
}

#[cfg(test)]
mod tests {
    use super::{default_style, final_prompt, list_all, lookup, strip_modifier};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn catalog_order_is_stable() {
        let ids: Vec<&str> = list_all().iter().map(|preset| preset.id).collect();
        assert_eq!(
            ids,
            vec![
                "photorealistic",
                "artistic",
                "digital_art",
                "fantasy",
                "sci_fi",
                "minimalist",
                "vintage",
                "abstract"
            ]
        );
        assert_eq!(default_style().id, "photorealistic");
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<&str> = list_all().iter().map(|preset| preset.id).collect();
        assert_eq!(ids.len(), list_all().len());
    }

    #[test]
    fn lookup_unknown_is_none() {
        assert!(lookup("watercolor").is_none());
        assert_eq!(lookup("sci_fi").map(|preset| preset.name), Some("Sci-Fi"));
    }

    #[test]
    fn final_prompt_appends_modifier() {
        assert_eq!(
            final_prompt("a red fox", Some("photorealistic")),
            "a red fox, photorealistic, high quality, professional photography, natural lighting, detailed"
        );
        assert_eq!(final_prompt("a red fox", Some("unknown")), "a red fox");
        assert_eq!(final_prompt("a red fox", None), "a red fox");
    }

    #[test]
    fn strip_modifier_inverts_final_prompt() {
        for preset in list_all() {
            let built = final_prompt("a lighthouse at dusk", Some(preset.id));
            assert_eq!(strip_modifier(&built, Some(preset.id)), "a lighthouse at dusk");
        }
        assert_eq!(strip_modifier("plain prompt", Some("vintage")), "plain prompt");
    }
}
