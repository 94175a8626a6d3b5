//! Cdn base url templates.
//!
//! Templates use `{{ variable }}` placeholders. Context fields (`name` and any
//! extras) are bound when the template is compiled; `url.*` variables are
//! bound per request from the canonical page url.
//!
//! # Design Decisions
//! - Unknown variables are rejected at compile time, never left literal
//! - Empty config produces no `cdn:*` entries

use crate::config::schema::{CdnConfig, InterrogationContext};
use crate::parameters::interrogator::PageUrl;
use crate::parameters::types::{namespace, ParameterError, ParameterMap};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Per-request variables taken from the page url.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlVariable {
    Href,
    /// Scheme with its trailing colon (`https:`).
    Protocol,
    Scheme,
    Host,
    Hostname,
    Port,
    Pathname,
    Search,
}

impl UrlVariable {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "url.href" => Some(Self::Href),
            "url.protocol" => Some(Self::Protocol),
            "url.scheme" => Some(Self::Scheme),
            "url.host" => Some(Self::Host),
            "url.hostname" => Some(Self::Hostname),
            "url.port" => Some(Self::Port),
            "url.pathname" => Some(Self::Pathname),
            "url.search" => Some(Self::Search),
            _ => None,
        }
    }

    fn resolve<'a>(self, url: &'a PageUrl) -> &'a str {
        match self {
            Self::Href => &url.href,
            Self::Protocol => url.protocol(),
            Self::Scheme => url.scheme,
            Self::Host => &url.host,
            Self::Hostname => &url.hostname,
            Self::Port => &url.port,
            Self::Pathname => &url.pathname,
            Self::Search => &url.search,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Url(UrlVariable),
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Template {
    segments: Vec<Segment>,
}

impl Template {
    fn compile(key: &str, raw: &str, context: &InterrogationContext) -> Result<Self, ParameterError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(start) = rest.find(OPEN) {
            literal.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or_else(|| ParameterError::UnterminatedPlaceholder { key: key.to_string() })?;
            let variable = after_open[..end].trim();

            if let Some(value) = context.get(variable) {
                literal.push_str(value);
            } else if let Some(url_var) = UrlVariable::parse(variable) {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Url(url_var));
            } else {
                return Err(ParameterError::UnknownTemplateVariable {
                    key: key.to_string(),
                    variable: variable.to_string(),
                });
            }

            rest = &after_open[end + CLOSE.len()..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    fn render(&self, url: &PageUrl) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Url(var) => var.resolve(url),
            })
            .collect()
    }
}

/// Resolves every configured cdn template for a request.
#[derive(Debug, Clone, Default)]
pub struct CdnUrlResolver {
    templates: Vec<(String, Template)>,
}

impl CdnUrlResolver {
    /// Compile all templates against the static context.
    pub fn new(cdn: &CdnConfig, context: &InterrogationContext) -> Result<Self, ParameterError> {
        let templates = cdn
            .iter()
            .map(|(key, raw)| Ok((key.clone(), Template::compile(key, raw, context)?)))
            .collect::<Result<Vec<_>, ParameterError>>()?;
        Ok(Self { templates })
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Write `cdn:<key>` for every template.
    pub fn resolve(&self, url: &PageUrl, params: &mut ParameterMap) {
        for (key, template) in &self.templates {
            params.insert(namespace::CDN, key, template.render(url));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> PageUrl {
        PageUrl::new("https", "static.example.com:8443", "/lessons/42", Some("tab=2"))
    }

    fn resolve(cdn: &[(&str, &str)], context: &InterrogationContext) -> ParameterMap {
        let cdn: CdnConfig = cdn
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let resolver = CdnUrlResolver::new(&cdn, context).unwrap();
        let mut params = ParameterMap::new();
        resolver.resolve(&page_url(), &mut params);
        params
    }

    #[test]
    fn test_context_name() {
        let params = resolve(
            &[("url", "http://my.cloudfront.net/{{name}}/")],
            &InterrogationContext::new("test"),
        );
        assert_eq!(params.get_str("cdn:url"), Some("http://my.cloudfront.net/test/"));
    }

    #[test]
    fn test_url_variables_and_whitespace() {
        let mut context = InterrogationContext::new("site");
        context.extra.insert("version".into(), "v3".into());

        let params = resolve(
            &[
                ("assets", "{{ url.scheme }}://{{url.hostname}}/{{ name }}/{{version}}"),
                ("self", "{{url.href}}"),
                ("parts", "{{url.port}}|{{url.pathname}}|{{url.search}}|{{url.host}}"),
            ],
            &context,
        );

        assert_eq!(params.get_str("cdn:assets"), Some("https://static.example.com/site/v3"));
        assert_eq!(
            params.get_str("cdn:self"),
            Some("https://static.example.com:8443/lessons/42?tab=2")
        );
        assert_eq!(
            params.get_str("cdn:parts"),
            Some("8443|/lessons/42|?tab=2|static.example.com:8443")
        );
    }

    #[test]
    fn test_protocol_carries_colon() {
        let params = resolve(
            &[("assets", "{{url.protocol}}//cdn.example.com/{{name}}")],
            &InterrogationContext::new("test"),
        );
        assert_eq!(params.get_str("cdn:assets"), Some("https://cdn.example.com/test"));

        let cdn: CdnConfig = [("assets".to_string(), "{{ url.protocol }}//cdn/".to_string())].into();
        let resolver = CdnUrlResolver::new(&cdn, &InterrogationContext::new("test")).unwrap();
        let mut params = ParameterMap::new();
        resolver.resolve(&PageUrl::new("http", "h", "/", None), &mut params);
        assert_eq!(params.get_str("cdn:assets"), Some("http://cdn/"));
    }

    #[test]
    fn test_literal_template() {
        let params = resolve(&[("url", "http://cdn.example.com/")], &InterrogationContext::new("x"));
        assert_eq!(params.get_str("cdn:url"), Some("http://cdn.example.com/"));
    }

    #[test]
    fn test_empty_config() {
        let params = resolve(&[], &InterrogationContext::new("test"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_unknown_variable_rejected() {
        let cdn: CdnConfig = [("url".to_string(), "http://cdn/{{region}}/".to_string())].into();
        let err = CdnUrlResolver::new(&cdn, &InterrogationContext::new("test")).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::UnknownTemplateVariable { ref variable, .. } if variable == "region"
        ));
    }

    #[test]
    fn test_unterminated_placeholder_rejected() {
        let cdn: CdnConfig = [("url".to_string(), "http://cdn/{{name/".to_string())].into();
        let err = CdnUrlResolver::new(&cdn, &InterrogationContext::new("test")).unwrap_err();
        assert!(matches!(err, ParameterError::UnterminatedPlaceholder { .. }));
    }
}
