use crate::config::SelectorConfig;
use crate::KbError;
use scraper::Selector;

/// CSS selectors compiled once per crawl
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub section_link: Selector,
    pub section_block: Selector,
    pub category_link: Selector,
    pub article_link: Selector,
    pub load_more: Selector,
    pub offset_field: Selector,
    pub breadcrumb: Selector,
    pub title: Selector,
    pub content: Selector,
}

impl CompiledSelectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, KbError> {
        Ok(Self {
            section_link: compile(&config.section_link)?,
            section_block: compile(&config.section_block)?,
            category_link: compile(&config.category_link)?,
            article_link: compile(&config.article_link)?,
            load_more: compile(&config.load_more)?,
            offset_field: compile(&config.offset_field)?,
            breadcrumb: compile(&config.breadcrumb)?,
            title: compile(&config.title)?,
            content: compile(&config.content)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, KbError> {
    Selector::parse(selector).map_err(|e| KbError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
