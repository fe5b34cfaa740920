//! JavaScript glue and TypeScript declaration generator.
//!
//! The generated module defines each custom element with
//! `customElements.define`, forwarding the lifecycle callbacks to the
//! component instance created by `component.newInstance(shadowRoot)`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;

use crate::css::process_css;
use crate::manifest::{ComponentManifest, Manifest};

/// The two configurations of the runtime shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimVariant {
    /// Attributes and lifecycle only
    Basic,
    /// Also defines property accessors from `component.properties`
    Extended,
}

/// Options for module generation.
#[derive(Debug, Clone)]
pub struct GlueOptions {
    /// Directory the manifest's relative paths are resolved from
    pub base_dir: PathBuf,

    /// Minify inlined CSS
    pub minify: bool,
}

impl Default for GlueOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            minify: true,
        }
    }
}

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Failed to read style {path}: {message}")]
    StyleReadError { path: String, message: String },

    #[error("{0}")]
    CssError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("<{first}> and <{second}> both generate class {class_name}")]
    ClassNameClash {
        first: String,
        second: String,
        class_name: String,
    },
}

impl From<minijinja::Error> for GenerateError {
    fn from(e: minijinja::Error) -> Self {
        Self::TemplateError(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ComponentView {
    tag: String,
    tag_literal: String,
    class_name: String,
    attributes: Vec<String>,
    properties: Vec<PropertyView>,
    events: Vec<EventView>,
    css: Option<String>,
    stylesheets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PropertyView {
    name: String,
    name_literal: String,
    readonly: bool,
    ty: String,
}

#[derive(Debug, Serialize)]
struct EventView {
    name_literal: String,
    detail: String,
}

/// Template-based glue generator.
pub struct GlueGenerator {
    env: Environment<'static>,
}

impl Default for GlueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GlueGenerator {
    /// Create a generator with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_template("shim", SHIM_TEMPLATE)
            .expect("Failed to add shim template");
        env.add_template("module", MODULE_TEMPLATE)
            .expect("Failed to add module template");
        env.add_template("typescript", TYPESCRIPT_TEMPLATE)
            .expect("Failed to add typescript template");

        Self { env }
    }

    /// The runtime shim `register_web_component(customTag, component)`.
    pub fn shim(&self, variant: ShimVariant) -> Result<String, GenerateError> {
        let tmpl = self.env.get_template("shim")?;
        let extended = variant == ShimVariant::Extended;
        Ok(tmpl.render(context! { extended })?)
    }

    /// The JavaScript module defining every component of the manifest.
    pub fn module(&self, manifest: &Manifest, options: &GlueOptions) -> Result<String, GenerateError> {
        let variant = if manifest.has_properties() {
            ShimVariant::Extended
        } else {
            ShimVariant::Basic
        };
        let shim = self.shim(variant)?;
        let components = self.views(manifest, Some(options))?;

        let tmpl = self.env.get_template("module")?;
        Ok(tmpl.render(context! { shim, components })?)
    }

    /// TypeScript declarations matching [`GlueGenerator::module`].
    pub fn typescript(&self, manifest: &Manifest) -> Result<String, GenerateError> {
        let components = self.views(manifest, None)?;
        let tmpl = self.env.get_template("typescript")?;
        Ok(tmpl.render(context! { components })?)
    }

    fn views(
        &self,
        manifest: &Manifest,
        options: Option<&GlueOptions>,
    ) -> Result<Vec<ComponentView>, GenerateError> {
        let mut class_names: HashMap<String, String> = HashMap::new();
        let mut views = Vec::with_capacity(manifest.components.len());

        for component in &manifest.components {
            let class_name = component.tag.class_name();
            if let Some(first) = class_names.insert(class_name.clone(), component.tag.to_string()) {
                return Err(GenerateError::ClassNameClash {
                    first,
                    second: component.tag.to_string(),
                    class_name,
                });
            }

            let css = match options {
                Some(options) => inline_css(component, options)?,
                None => None,
            };

            views.push(ComponentView {
                tag: component.tag.to_string(),
                tag_literal: js_string(component.tag.as_str()),
                class_name,
                attributes: component.attributes.iter().map(|a| js_string(a)).collect(),
                properties: component
                    .properties
                    .iter()
                    .map(|p| PropertyView {
                        name: p.name.clone(),
                        name_literal: js_string(&p.name),
                        readonly: p.readonly,
                        ty: p.ty.clone().unwrap_or_else(|| "unknown".to_string()),
                    })
                    .collect(),
                events: component
                    .events
                    .iter()
                    .map(|e| EventView {
                        name_literal: js_string(&e.name),
                        detail: e.detail.clone().unwrap_or_else(|| "unknown".to_string()),
                    })
                    .collect(),
                css,
                stylesheets: component
                    .style
                    .stylesheets
                    .iter()
                    .map(|s| js_string(s))
                    .collect(),
            });
        }

        Ok(views)
    }
}

/// Read and process the component CSS files into one JS string literal.
fn inline_css(
    component: &ComponentManifest,
    options: &GlueOptions,
) -> Result<Option<String>, GenerateError> {
    if component.style.css.is_empty() {
        return Ok(None);
    }

    let mut combined = String::new();
    for path in &component.style.css {
        let path = resolve(&options.base_dir, path);
        let css = fs::read_to_string(&path).map_err(|e| GenerateError::StyleReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        combined.push_str(&process_css(&css, options.minify)?);
        if !options.minify {
            combined.push('\n');
        }
    }

    tracing::debug!(
        "Inlined {} CSS file(s) for <{}> ({} bytes)",
        component.style.css.len(),
        component.tag,
        combined.len()
    );

    Ok(Some(js_string(&combined)))
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Quote a string as a single-quoted JavaScript literal.
fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

const SHIM_TEMPLATE: &str = r#"export function register_web_component(customTag, component) {
  customElements.define(
    customTag,
    class extends HTMLElement {
      static get observedAttributes() {
        return component.attributes;
      }

      constructor() {
        super();
        this.attachShadow({ mode: "open" });
        const instance = component.newInstance(this.shadowRoot);
        {% if extended %}
        for (const { name, readonly } of component.properties) {
          const descriptor = {
            get() {
              return instance.getProperty(name);
            },
          };
          if (!readonly) {
            descriptor.set = function (value) {
              instance.setProperty(name, value);
            };
          }
          Object.defineProperty(this, name, descriptor);
        }
        {% endif %}
        this.instance = instance;
      }

      attributeChangedCallback(name, oldValue, newValue) {
        this.instance.attributeChanged(name, oldValue, newValue);
      }

      connectedCallback() {
        this.instance.connect(this);
      }

      disconnectedCallback() {
        this.instance.disconnect();
      }
    }
  );
}
"#;

const MODULE_TEMPLATE: &str = r#"// Generated by shroud. Do not edit.

{{ shim }}
{% for c in components %}

/**
 * Define <{{ c.tag }}>.
 */
export function define{{ c.class_name }}(component) {
  customElements.define(
    {{ c.tag_literal }},
    class {{ c.class_name }} extends HTMLElement {
      static get observedAttributes() {
        return [{{ c.attributes | join(", ") }}];
      }

      constructor() {
        super();
        this.attachShadow({ mode: "open" });
        {% if c.css %}
        const style = document.createElement("style");
        style.textContent = {{ c.css }};
        this.shadowRoot.appendChild(style);
        {% endif %}
        {% if c.stylesheets %}
        for (const href of [{{ c.stylesheets | join(", ") }}]) {
          const link = document.createElement("link");
          link.rel = "stylesheet";
          link.href = href;
          this.shadowRoot.appendChild(link);
        }
        {% endif %}
        const instance = component.newInstance(this.shadowRoot);
        {% for p in c.properties %}
        {% if p.readonly %}
        Object.defineProperty(this, {{ p.name_literal }}, {
          get() {
            return instance.getProperty({{ p.name_literal }});
          },
        });
        {% else %}
        Object.defineProperty(this, {{ p.name_literal }}, {
          get() {
            return instance.getProperty({{ p.name_literal }});
          },
          set(value) {
            instance.setProperty({{ p.name_literal }}, value);
          },
        });
        {% endif %}
        {% endfor %}
        this.instance = instance;
      }

      attributeChangedCallback(name, oldValue, newValue) {
        this.instance.attributeChanged(name, oldValue, newValue);
      }

      connectedCallback() {
        this.instance.connect(this);
      }

      disconnectedCallback() {
        this.instance.disconnect();
      }
    }
  );
}
{% endfor %}

/**
 * Define every component, keyed by tag.
 */
export function defineAll(components) {
  {% for c in components %}
  define{{ c.class_name }}(components[{{ c.tag_literal }}]);
  {% endfor %}
}
"#;

const TYPESCRIPT_TEMPLATE: &str = r#"// Generated by shroud. Do not edit.

export interface ComponentInstance {
  attributeChanged(name: string, oldValue: string | null, newValue: string | null): void;
  connect(host: HTMLElement): void;
  disconnect(): void;
  getProperty(name: string): unknown;
  setProperty(name: string, value: unknown): void;
}

export interface Component {
  readonly attributes: string[];
  readonly properties?: { name: string; readonly: boolean }[];
  newInstance(root: ShadowRoot): ComponentInstance;
}

export function register_web_component(customTag: string, component: Component): void;
{% for c in components %}

export interface {{ c.class_name }}Element extends HTMLElement {
  {% for p in c.properties %}
  {% if p.readonly %}
  readonly {{ p.name }}: {{ p.ty }} | Promise<{{ p.ty }}>;
  {% else %}
  get {{ p.name }}(): {{ p.ty }} | Promise<{{ p.ty }}>;
  set {{ p.name }}(value: {{ p.ty }});
  {% endif %}
  {% endfor %}
}
{% if c.events %}

export interface {{ c.class_name }}EventMap extends HTMLElementEventMap {
  {% for e in c.events %}
  {{ e.name_literal }}: CustomEvent<{{ e.detail }}>;
  {% endfor %}
}
{% endif %}

export function define{{ c.class_name }}(component: Component): void;
{% endfor %}

export function defineAll(components: Record<string, Component>): void;

declare global {
  interface HTMLElementTagNameMap {
    {% for c in components %}
    {{ c.tag_literal }}: {{ c.class_name }}Element;
    {% endfor %}
  }
}
"#;
