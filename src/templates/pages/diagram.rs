use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Static branch network diagram the chat assistant opens on request.
pub fn diagram_page() -> Markup {
    desktop_layout(
        "DFX - Branch Network",
        html! {
            main class="container" {
                h1 { "Branch Network Topology" }
                section class="card" {
                    svg viewBox="0 0 640 300" role="img" aria-label="Branch network diagram" {
                        rect x="260" y="20" width="120" height="44" rx="6" class="node core" {}
                        text x="320" y="47" text-anchor="middle" { "Core FW" }

                        line x1="320" y1="64" x2="130" y2="140" class="link" {}
                        line x1="320" y1="64" x2="320" y2="140" class="link" {}
                        line x1="320" y1="64" x2="510" y2="140" class="link" {}

                        rect x="70" y="140" width="120" height="44" rx="6" class="node" {}
                        text x="130" y="167" text-anchor="middle" { "Branch East" }
                        rect x="260" y="140" width="120" height="44" rx="6" class="node" {}
                        text x="320" y="167" text-anchor="middle" { "Branch Central" }
                        rect x="450" y="140" width="120" height="44" rx="6" class="node" {}
                        text x="510" y="167" text-anchor="middle" { "Branch West" }

                        line x1="320" y1="184" x2="320" y2="240" class="link" {}
                        rect x="245" y="240" width="150" height="44" rx="6" class="node dmz" {}
                        text x="320" y="267" text-anchor="middle" { "DMZ / Services" }
                    }
                    p class="hint" {
                        "Pushed policies land on the core firewall and propagate to the branches."
                    }
                }
            }
        },
    )
}
