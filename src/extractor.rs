//! Extraction engine seam.
//!
//! The pipeline only acquires and normalizes input; deciding what is readable
//! is delegated to an [`Extractor`]. [`ReadabilityExtractor`] is the bundled
//! implementation (feature `readability`).

use std::io::Read;

use dom_query::Document;
use url::Url;

use crate::error::Result;
use crate::result::Article;

/// A content extraction engine.
///
/// Implementations should keep per-document state local to each call so
/// one engine can serve many pipelines and threads.
pub trait Extractor {
    /// Extracts the article from an HTML byte stream.
    fn parse(&self, input: &mut dyn Read, page_url: &Url) -> Result<Article>;

    /// Extracts the article from an already built document tree.
    fn parse_document(&self, document: &Document, page_url: &Url) -> Result<Article>;

    /// Cheap feasibility check: is the stream likely to contain an article?
    fn check(&self, input: &mut dyn Read) -> bool;

    /// Cheap feasibility check on a document tree.
    fn check_document(&self, document: &Document) -> bool;
}

impl<E: Extractor + ?Sized> Extractor for &E {
    fn parse(&self, input: &mut dyn Read, page_url: &Url) -> Result<Article> {
        (**self).parse(input, page_url)
    }

    fn parse_document(&self, document: &Document, page_url: &Url) -> Result<Article> {
        (**self).parse_document(document, page_url)
    }

    fn check(&self, input: &mut dyn Read) -> bool {
        (**self).check(input)
    }

    fn check_document(&self, document: &Document) -> bool {
        (**self).check_document(document)
    }
}

impl<E: Extractor + ?Sized> Extractor for Box<E> {
    fn parse(&self, input: &mut dyn Read, page_url: &Url) -> Result<Article> {
        (**self).parse(input, page_url)
    }

    fn parse_document(&self, document: &Document, page_url: &Url) -> Result<Article> {
        (**self).parse_document(document, page_url)
    }

    fn check(&self, input: &mut dyn Read) -> bool {
        (**self).check(input)
    }

    fn check_document(&self, document: &Document) -> bool {
        (**self).check_document(document)
    }
}

#[cfg(feature = "readability")]
pub use self::readability::ReadabilityExtractor;

#[cfg(feature = "readability")]
mod readability {
    use std::io::Read;

    use dom_query::Document;
    use dom_smoothie::{Config, Readability};
    use log::debug;
    use url::Url;

    use super::Extractor;
    use crate::encoding;
    use crate::error::{Error, Result};
    use crate::options::ReadabilityOptions;
    use crate::result::{self, Article};

    /// Readability engine backed by `dom_smoothie`.
    ///
    /// Holds configuration only; every call builds a fresh parser.
    #[derive(Debug, Clone, Default)]
    pub struct ReadabilityExtractor {
        options: ReadabilityOptions,
    }

    impl ReadabilityExtractor {
        #[must_use]
        pub fn new(options: ReadabilityOptions) -> Self {
            Self { options }
        }

        #[must_use]
        pub fn options(&self) -> &ReadabilityOptions {
            &self.options
        }

        fn config(&self) -> Config {
            let opts = &self.options;
            Config {
                max_elements_to_parse: opts.max_elements_to_parse,
                n_top_candidates: opts.n_top_candidates,
                char_threshold: opts.char_threshold,
                keep_classes: opts.keep_classes,
                classes_to_preserve: opts.classes_to_preserve.clone(),
                disable_json_ld: opts.disable_json_ld,
                ..Config::default()
            }
        }

        fn run(&self, mut reader: Readability, page_url: Option<&Url>) -> Result<Article> {
            let parsed = reader.parse().map_err(|e| Error::Parse(e.to_string()))?;
            let mut article = Article {
                title: parsed.title.to_string(),
                byline: non_empty(parsed.byline),
                excerpt: non_empty(parsed.excerpt),
                site_name: non_empty(parsed.site_name),
                language: non_empty(parsed.lang),
                direction: non_empty(parsed.dir),
                content: parsed.content.to_string(),
                text_content: parsed.text_content.to_string(),
                length: parsed.length,
                published_time: non_empty(parsed.published_time)
                    .as_deref()
                    .and_then(result::parse_published_time),
                image: non_empty(parsed.image),
                favicon: non_empty(parsed.favicon),
                url: non_empty(parsed.url),
            };
            if article.url.is_none() {
                article.url = page_url.map(ToString::to_string);
            }
            debug!(
                "readability extracted {} chars (title {:?})",
                article.length, article.title
            );
            Ok(article)
        }
    }

    fn non_empty<T: ToString>(value: Option<T>) -> Option<String> {
        value
            .map(|v| v.to_string())
            .filter(|v| !v.trim().is_empty())
    }

    fn read_html(input: &mut dyn Read) -> Result<String> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        Ok(encoding::decode_html(&bytes).into_owned())
    }

    impl Extractor for ReadabilityExtractor {
        fn parse(&self, input: &mut dyn Read, page_url: &Url) -> Result<Article> {
            let html = read_html(input)?;
            let reader = Readability::new(html, Some(page_url.as_str()), Some(self.config()))
                .map_err(|e| Error::Parse(e.to_string()))?;
            self.run(reader, Some(page_url))
        }

        fn parse_document(&self, document: &Document, page_url: &Url) -> Result<Article> {
            let reader = Readability::with_document(
                document.clone(),
                Some(page_url.as_str()),
                Some(self.config()),
            )
            .map_err(|e| Error::Parse(e.to_string()))?;
            self.run(reader, Some(page_url))
        }

        fn check(&self, input: &mut dyn Read) -> bool {
            let Ok(html) = read_html(input) else {
                return false;
            };
            Readability::new(html, None, Some(self.config()))
                .is_ok_and(|reader| reader.is_probably_readable())
        }

        fn check_document(&self, document: &Document) -> bool {
            Readability::with_document(document.clone(), None, Some(self.config()))
                .is_ok_and(|reader| reader.is_probably_readable())
        }
    }

}
