use crate::error::{ReelgenError, ReelgenResult};
use handlebars::Handlebars;
use serde_json::json;

const TOPIC_PROMPT: &str = include_str!("prompts/topic.hbs");
const SCRIPT_PROMPT: &str = include_str!("prompts/script.hbs");
const TITLE_PROMPT: &str = include_str!("prompts/title.hbs");
const DESCRIPTION_PROMPT: &str = include_str!("prompts/description.hbs");
const IMAGE_PROMPTS_PROMPT: &str = include_str!("prompts/image-prompts.hbs");

/// The prompt templates driving every completion in the pipeline.
pub struct PromptRegistry<'a> {
    hbs: Handlebars<'a>,
}

impl<'a> PromptRegistry<'a> {
    pub fn new() -> ReelgenResult<Self> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true); // every placeholder is mandatory
        hbs.register_escape_fn(handlebars::no_escape); // prompts are plain text, not HTML

        for (name, template) in [
            ("topic", TOPIC_PROMPT),
            ("script", SCRIPT_PROMPT),
            ("title", TITLE_PROMPT),
            ("description", DESCRIPTION_PROMPT),
            ("image-prompts", IMAGE_PROMPTS_PROMPT),
        ] {
            hbs.register_template_string(name, template)
                .map_err(|e| ReelgenError::Template(e.to_string()))?;
        }

        Ok(Self { hbs })
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> ReelgenResult<String> {
        self.hbs
            .render(name, data)
            .map(|s| s.trim().to_string())
            .map_err(|e| ReelgenError::Template(e.to_string()))
    }

    pub fn topic(&self, niche: &str) -> ReelgenResult<String> {
        self.render("topic", &json!({ "niche": niche }))
    }

    pub fn script(&self, topic: &str, language: &str) -> ReelgenResult<String> {
        self.render("script", &json!({ "topic": topic, "language": language }))
    }

    pub fn title(&self, topic: &str) -> ReelgenResult<String> {
        self.render("title", &json!({ "topic": topic }))
    }

    pub fn description(&self, script: &str) -> ReelgenResult<String> {
        self.render("description", &json!({ "script": script }))
    }

    pub fn image_prompts(&self, script: &str, count: usize) -> ReelgenResult<String> {
        self.render("image-prompts", &json!({ "script": script, "count": count }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_prompt_includes_niche() {
        let prompts = PromptRegistry::new().unwrap();
        let rendered = prompts.topic("urban beekeeping").unwrap();
        assert!(rendered.contains("urban beekeeping"));
    }

    #[test]
    fn test_script_prompt_includes_topic_and_language() {
        let prompts = PromptRegistry::new().unwrap();
        let rendered = prompts.script("hive inspection basics", "German").unwrap();
        assert!(rendered.contains("hive inspection basics"));
        assert!(rendered.contains("German"));
    }

    #[test]
    fn test_title_and_description_prompts() {
        let prompts = PromptRegistry::new().unwrap();
        assert!(prompts.title("T").unwrap().contains('T'));
        assert!(prompts.description("S").unwrap().contains('S'));
    }

    #[test]
    fn test_placeholders_are_not_html_escaped() {
        let prompts = PromptRegistry::new().unwrap();
        let rendered = prompts.topic("kids' crafts & DIY").unwrap();
        assert!(rendered.contains("kids' crafts & DIY"));
    }

    #[test]
    fn test_image_prompts_prompt_includes_count() {
        let prompts = PromptRegistry::new().unwrap();
        let rendered = prompts.image_prompts("some script", 3).unwrap();
        assert!(rendered.contains('3'));
        assert!(rendered.contains("JSON array"));
    }
}
