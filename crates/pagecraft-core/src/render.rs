//! Server-side HTML rendering of a published page.
//!
//! The output is a single self-contained document: theme variables and role
//! classes in a `<style>` block, the visible sections in config order, a lead
//! form posting to `/v1/leads`, and a small script that reports `page_view`,
//! `cta_click` and `form_submit` events to `/v1/events`. Every piece of
//! config text is HTML-escaped.

use crate::config::{LandingPageConfig, SectionId};
use crate::highlight::strip_non_word;
use crate::pages::Page;
use crate::theme::{ThemeClasses, classes_for, css_block, rgba};

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render `page` as a complete HTML document.
#[must_use]
pub fn render_page(page: &Page) -> String {
    let config = &page.config;
    let classes = classes_for(&config.theme);

    let mut html = String::with_capacity(16384);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"/>");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\"/>");
    html.push_str(&format!("<title>{}</title>", escape_html(&page.title)));
    html.push_str("<style>");
    html.push_str(&css_block(&config.theme));
    html.push_str(&role_css(&classes));
    if let Ok(glow) = rgba(&config.theme.accent_color, 0.15) {
        html.push_str(&format!(".hero{{background:radial-gradient(circle at top,{glow},transparent 60%)}}"));
    }
    html.push_str(PAGE_CSS);
    html.push_str("</style></head>");

    html.push_str(&format!(
        "<body class=\"{} {}\" data-page-id=\"{}\">",
        classes.background, classes.text, page.id
    ));

    for section in config.visible_sections() {
        match section {
            SectionId::Hero => render_hero(&mut html, config, &classes),
            SectionId::Problem => render_problem(&mut html, config, &classes),
            SectionId::SocialProof => render_social_proof(&mut html, config, &classes),
            SectionId::Features => render_features(&mut html, config, &classes),
            SectionId::Guarantees => render_guarantees(&mut html, config, &classes),
            SectionId::Faq => render_faq(&mut html, config, &classes),
            SectionId::Cta => render_cta(&mut html, config, &classes),
        }
    }

    html.push_str(TRACKING_SCRIPT);
    html.push_str("</body></html>");
    html
}

/// Give each role class its color from the theme variables.
fn role_css(classes: &ThemeClasses) -> String {
    let mut css = String::new();
    for (role, class) in classes.roles() {
        let rule = match role {
            "background" => "background:var(--background)",
            "surface" => "background:var(--surface)",
            "muted" => "background:var(--muted)",
            "text" => "color:var(--text)",
            "textSecondary" => "color:var(--text-secondary)",
            "border" => "border-color:var(--border)",
            _ => "color:var(--muted-text)",
        };
        css.push_str(&format!(".{class}{{{rule}}}"));
    }
    css
}

/// The headline with highlighted words wrapped in `<span class="highlight">`.
fn headline_html(headline: &str, highlights: &[String]) -> String {
    headline
        .split_whitespace()
        .map(|token| {
            let word = strip_non_word(token);
            if highlights.iter().any(|h| *h == word) {
                format!("<span class=\"highlight\">{}</span>", escape_html(token))
            } else {
                escape_html(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn section_heading(html: &mut String, title: &str, subtitle: Option<&String>, classes: &ThemeClasses) {
    html.push_str(&format!("<h2>{}</h2>", escape_html(title)));
    if let Some(subtitle) = subtitle {
        html.push_str(&format!(
            "<p class=\"subtitle {}\">{}</p>",
            classes.text_secondary,
            escape_html(subtitle)
        ));
    }
}

fn render_hero(html: &mut String, config: &LandingPageConfig, classes: &ThemeClasses) {
    let hero = &config.hero;
    html.push_str("<header class=\"hero\" id=\"hero\">");
    if let Some(business) = &config.business {
        html.push_str(&format!("<div class=\"brand\">{}</div>", escape_html(&business.name)));
    }
    if let Some(tag) = &hero.hero_tag {
        html.push_str(&format!(
            "<span class=\"tag {} {}\">{}</span>",
            classes.muted,
            classes.border,
            escape_html(tag)
        ));
    }
    html.push_str(&format!(
        "<h1>{}</h1>",
        headline_html(&hero.headline, &hero.headline_highlights)
    ));
    html.push_str(&format!(
        "<p class=\"lead {}\">{}</p>",
        classes.text_secondary,
        escape_html(&hero.subheadline)
    ));
    // The button scrolls to the signup form, so it goes when that section does.
    if !hero.cta.is_empty() && !config.is_hidden(SectionId::Cta) {
        html.push_str(&format!(
            "<a class=\"button cta\" href=\"#signup\">{}</a>",
            escape_html(&hero.cta)
        ));
    }
    html.push_str("</header>");
}

fn render_problem(html: &mut String, config: &LandingPageConfig, classes: &ThemeClasses) {
    let Some(problem) = &config.problem_section else {
        return;
    };
    html.push_str(&format!("<section id=\"problem\" class=\"{}\">", classes.surface));
    section_heading(html, &problem.title, problem.subtitle.as_ref(), classes);
    html.push_str("<div class=\"grid\">");
    for point in &problem.pain_points {
        html.push_str(&format!(
            "<div class=\"card {} {}\"><h3>{}</h3><p class=\"{}\">{}</p></div>",
            classes.background,
            classes.border,
            escape_html(&point.title),
            classes.text_secondary,
            escape_html(&point.description)
        ));
    }
    html.push_str("</div></section>");
}

fn render_social_proof(html: &mut String, config: &LandingPageConfig, classes: &ThemeClasses) {
    let Some(proof) = &config.social_proof else {
        return;
    };
    html.push_str("<section id=\"social-proof\">");
    section_heading(html, &proof.title, proof.subtitle.as_ref(), classes);
    if !proof.stats.is_empty() {
        html.push_str("<div class=\"stats\">");
        for stat in &proof.stats {
            html.push_str(&format!(
                "<div class=\"stat\"><strong>{}</strong><span class=\"{}\">{}</span></div>",
                escape_html(&stat.value),
                classes.muted_text,
                escape_html(&stat.label)
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("<div class=\"grid\">");
    for testimonial in &proof.testimonials {
        let author = match &testimonial.role {
            Some(role) => format!("{}, {}", testimonial.author, role),
            None => testimonial.author.clone(),
        };
        html.push_str(&format!(
            "<figure class=\"card {} {}\"><blockquote>{}</blockquote><figcaption class=\"{}\">{}</figcaption></figure>",
            classes.surface,
            classes.border,
            escape_html(&testimonial.quote),
            classes.muted_text,
            escape_html(&author)
        ));
    }
    html.push_str("</div></section>");
}

fn render_features(html: &mut String, config: &LandingPageConfig, classes: &ThemeClasses) {
    if config.features.is_empty() {
        return;
    }
    html.push_str("<section id=\"features\"><div class=\"grid\">");
    for feature in &config.features {
        html.push_str(&format!(
            "<div class=\"card {} {}\"><h3>{}</h3><p class=\"{}\">{}</p>",
            classes.surface,
            classes.border,
            escape_html(&feature.title),
            classes.text_secondary,
            escape_html(&feature.description)
        ));
        if let Some(benefit) = &feature.benefit {
            html.push_str(&format!("<p class=\"benefit\">{}</p>", escape_html(benefit)));
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
}

fn render_guarantees(html: &mut String, config: &LandingPageConfig, classes: &ThemeClasses) {
    let Some(guarantees) = &config.guarantees else {
        return;
    };
    html.push_str(&format!("<section id=\"guarantees\" class=\"{}\">", classes.surface));
    section_heading(html, &guarantees.title, guarantees.subtitle.as_ref(), classes);
    html.push_str("<div class=\"grid\">");
    for item in &guarantees.items {
        html.push_str(&format!(
            "<div class=\"card {} {}\"><h3>{}</h3><p class=\"{}\">{}</p></div>",
            classes.background,
            classes.border,
            escape_html(&item.title),
            classes.text_secondary,
            escape_html(&item.description)
        ));
    }
    html.push_str("</div></section>");
}

fn render_faq(html: &mut String, config: &LandingPageConfig, classes: &ThemeClasses) {
    let Some(faq) = &config.faq else {
        return;
    };
    html.push_str("<section id=\"faq\">");
    section_heading(html, &faq.title, faq.subtitle.as_ref(), classes);
    for item in &faq.items {
        html.push_str(&format!(
            "<details class=\"{}\"><summary>{}</summary><p class=\"{}\">{}</p></details>",
            classes.border,
            escape_html(&item.question),
            classes.text_secondary,
            escape_html(&item.answer)
        ));
    }
    html.push_str("</section>");
}

fn render_cta(html: &mut String, config: &LandingPageConfig, classes: &ThemeClasses) {
    let title = config.cta_title.as_deref().unwrap_or("Get started");
    let button = if config.hero.cta.is_empty() {
        "Sign up"
    } else {
        config.hero.cta.as_str()
    };

    html.push_str(&format!("<section id=\"signup\" class=\"{}\">", classes.muted));
    html.push_str(&format!("<h2>{}</h2>", escape_html(title)));
    if let Some(subtitle) = &config.cta_subtitle {
        html.push_str(&format!(
            "<p class=\"subtitle {}\">{}</p>",
            classes.text_secondary,
            escape_html(subtitle)
        ));
    }
    if let Some(urgency) = &config.urgency {
        html.push_str(&format!("<p class=\"urgency\">{}</p>", escape_html(urgency)));
    }
    html.push_str(&format!(
        "<form id=\"lead-form\"><input name=\"name\" placeholder=\"Name\" class=\"{border}\"/>\
         <input name=\"email\" type=\"email\" required placeholder=\"Email\" class=\"{border}\"/>\
         <button type=\"submit\" class=\"button cta\">{}</button></form>\
         <p id=\"lead-status\" class=\"{}\"></p>",
        escape_html(button),
        classes.muted_text,
        border = classes.border,
    ));
    html.push_str("</section>");
}

const PAGE_CSS: &str = "*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}\
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;line-height:1.6}\
header,section{padding:72px 24px;text-align:center}\
h1{font-size:clamp(2rem,5vw,3.5rem);line-height:1.15;max-width:820px;margin:16px auto}\
h2{font-size:2rem;margin-bottom:12px}\
.brand{font-weight:800;font-size:1.1rem}\
.tag{display:inline-block;padding:4px 14px;border:1px solid;border-radius:999px;font-size:.85rem}\
.highlight{color:var(--accent);background:var(--accent-20);padding:0 .2em;border-radius:4px}\
.lead,.subtitle{max-width:640px;margin:0 auto 28px}\
.button{display:inline-block;padding:12px 28px;border:none;border-radius:999px;background:var(--accent);color:#fff;font-weight:700;cursor:pointer;text-decoration:none}\
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(240px,1fr));gap:20px;max-width:1080px;margin:32px auto 0;text-align:left}\
.card{padding:24px;border:1px solid;border-radius:16px}\
.benefit{margin-top:12px;color:var(--accent);font-weight:600}\
.stats{display:flex;justify-content:center;gap:48px;margin:24px 0}\
.stat strong{display:block;font-size:2rem;color:var(--accent)}\
details{max-width:720px;margin:12px auto;padding:16px;border:1px solid;border-radius:12px;text-align:left}\
summary{font-weight:600;cursor:pointer}\
.urgency{color:var(--accent);font-weight:600;margin-bottom:20px}\
form{display:flex;flex-wrap:wrap;gap:12px;justify-content:center;max-width:640px;margin:0 auto}\
input{flex:1 1 200px;padding:12px 16px;border:1px solid;border-radius:999px;background:var(--background);color:var(--text)}";

const TRACKING_SCRIPT: &str = r#"<script>
(function(){
  var pageId = document.body.dataset.pageId;
  var session = sessionStorage.getItem("pagecraft_sid");
  if (!session) {
    session = Math.random().toString(36).slice(2) + Date.now().toString(36);
    sessionStorage.setItem("pagecraft_sid", session);
  }
  var utm = new URLSearchParams(location.search).get("utm_source");
  function track(type) {
    fetch("/v1/events", {method: "POST", headers: {"Content-Type": "application/json"}, keepalive: true,
      body: JSON.stringify({landing_page_id: pageId, event_type: type, session_id: session,
        referrer: document.referrer || null, utm_source: utm})});
  }
  track("page_view");
  document.querySelectorAll("a.cta").forEach(function(el){
    el.addEventListener("click", function(){ track("cta_click"); });
  });
  var form = document.getElementById("lead-form");
  if (form) {
    form.addEventListener("submit", function(ev){
      ev.preventDefault();
      var data = new FormData(form);
      var status = document.getElementById("lead-status");
      fetch("/v1/leads", {method: "POST", headers: {"Content-Type": "application/json"},
        body: JSON.stringify({page_id: pageId, name: data.get("name") || null, email: data.get("email"),
          source: utm || "landing_page"})})
        .then(function(res){ return res.json().then(function(body){ return {ok: res.ok, body: body}; }); })
        .then(function(r){
          if (r.ok) { track("form_submit"); form.reset(); status.textContent = "Thanks! We'll be in touch."; }
          else { status.textContent = r.body.message || "Something went wrong."; }
        });
    });
  }
})();
</script>"#;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::normalize;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn page(raw: serde_json::Value) -> Page {
        let config = normalize(raw).unwrap();
        Page {
            id: Uuid::nil(),
            owner_id: "alice".to_owned(),
            slug: "demo-abc123".to_owned(),
            title: config.title().to_owned(),
            config,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn base() -> serde_json::Value {
        json!({
            "business": {"name": "Crumb & Co"},
            "hero": {
                "headline": "Fresh bread, Fast.",
                "headlineHighlights": ["Fast"],
                "subheadline": "Baked <daily>",
                "cta": "Order now"
            },
            "features": [{"title": "Sourdough", "description": "Slow risen", "benefit": "Tastes better"}],
            "faq": {"title": "Questions", "items": [{"question": "Gluten free?", "answer": "Some loaves."}]},
            "theme": {"mode": "black", "accentColor": "#f97316"}
        })
    }

    #[test]
    fn escape_html_covers_specials() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn renders_theme_and_content() {
        let html = render_page(&page(base()));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Crumb &amp; Co</title>"));
        assert!(html.contains("--accent:#f97316;"));
        assert!(html.contains("--accent-50:#f9731680;"));
        assert!(html.contains(".bg-black{background:var(--background)}"));
        assert!(html.contains("Baked &lt;daily&gt;"));
        assert!(html.contains("Sourdough"));
        assert!(html.contains("Gluten free?"));
        assert!(html.contains("data-page-id=\"00000000-0000-0000-0000-000000000000\""));
    }

    #[test]
    fn highlights_are_wrapped() {
        let html = render_page(&page(base()));
        assert!(html.contains("<h1>Fresh bread, <span class=\"highlight\">Fast.</span></h1>"));
    }

    #[test]
    fn hidden_sections_are_skipped() {
        let mut raw = base();
        raw["hiddenSections"] = json!(["faq"]);
        let html = render_page(&page(raw));
        assert!(!html.contains("Gluten free?"));
        assert!(!html.contains("id=\"faq\""));
        assert!(html.contains("Sourdough"));
    }

    #[test]
    fn hero_button_needs_signup_section() {
        let html = render_page(&page(base()));
        assert!(html.contains("href=\"#signup\""));

        let mut raw = base();
        raw["hiddenSections"] = json!(["cta"]);
        let html = render_page(&page(raw));
        assert!(!html.contains("href=\"#signup\""));
        assert!(!html.contains("id=\"signup\""));
        assert!(html.contains("Fresh bread"));
    }

    #[test]
    fn sections_follow_configured_order() {
        let mut raw = base();
        raw["sectionOrder"] = json!(["faq", "features"]);
        let html = render_page(&page(raw));
        let faq = html.find("id=\"faq\"").unwrap();
        let features = html.find("id=\"features\"").unwrap();
        let hero = html.find("id=\"hero\"").unwrap();
        assert!(faq < features);
        assert!(features < hero);
    }

    #[test]
    fn lead_form_and_tracking_present() {
        let html = render_page(&page(base()));
        assert!(html.contains("id=\"lead-form\""));
        assert!(html.contains("/v1/leads"));
        assert!(html.contains("/v1/events"));
        assert!(html.contains("Order now"));
    }
}
