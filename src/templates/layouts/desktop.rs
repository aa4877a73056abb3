use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="topbar" {
                    span class="brand" { "DFX" }
                    nav {
                        ul {
                            li { a href="/" { "Dashboard" } }
                            li { a href="/diagram" { "Topology" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
