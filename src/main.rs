// src/main.rs
use gloo_net::http::Request;
use useful_image_map::components::map_viewer::MapViewer;
use useful_image_map::map_config::MapManifest;
use useful_image_map::utils::resource_url;
use yew::prelude::*;

pub enum AppMsg {
    ChangeMap(String),
    ManifestLoaded(MapManifest),
    ManifestLoadFailed(String),
    AreaClicked(String),
}

pub struct App {
    current_map: String,
    manifest: MapManifest,
    last_clicked: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_future(async {
            match load_manifest().await {
                Ok(manifest) => AppMsg::ManifestLoaded(manifest),
                Err(e) => AppMsg::ManifestLoadFailed(e),
            }
        });

        Self {
            current_map: String::new(),
            manifest: MapManifest { maps: Vec::new() },
            last_clicked: None,
            loading: true,
            error: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::ChangeMap(id) => {
                self.current_map = id;
                self.last_clicked = None;
                true
            }
            AppMsg::ManifestLoaded(manifest) => {
                // Drop entries whose areas would not parse instead of failing the whole page.
                let maps = manifest
                    .maps
                    .into_iter()
                    .filter(|map| match map.validate() {
                        Ok(_) => true,
                        Err(e) => {
                            log::warn!("Skipping map {}: {}", map.id, e);
                            false
                        }
                    })
                    .collect();
                self.manifest = MapManifest { maps };
                self.loading = false;
                log::info!("Loaded {} image maps", self.manifest.maps.len());

                if let Some(first) = self.manifest.maps.first() {
                    self.current_map = first.id.clone();
                }
                true
            }
            AppMsg::ManifestLoadFailed(error) => {
                log::error!("Failed to load manifest: {}", error);
                self.error = Some(error);
                self.loading = false;
                true
            }
            AppMsg::AreaClicked(label) => {
                log::info!("Area clicked: {}", label);
                self.last_clicked = Some(label);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.loading {
            return html! {
                <div class="app-container">
                    <header class="app-header">
                        <h1>{"Useful Image Map"}</h1>
                    </header>
                    <main class="app-main">
                        <div class="loading">{"Loading maps..."}</div>
                    </main>
                </div>
            };
        }

        if self.manifest.maps.is_empty() {
            let detail = self
                .error
                .clone()
                .unwrap_or_else(|| "manifest lists no usable maps".to_string());
            return html! {
                <div class="app-container">
                    <header class="app-header">
                        <h1>{"Useful Image Map"}</h1>
                    </header>
                    <main class="app-main">
                        <div class="error">{format!("No image maps available: {}. Check public/maps/manifest.json", detail)}</div>
                    </main>
                </div>
            };
        }

        let on_map_change = ctx.link().callback(AppMsg::ChangeMap);
        let on_area_click = ctx.link().callback(AppMsg::AreaClicked);

        let current = self.manifest.get_map(&self.current_map).cloned();

        html! {
            <div class="app-container">
                <header class="app-header">
                    <h1>{"Useful Image Map"}</h1>
                    <p class="subtitle">{"Clickable areas that follow the image size"}</p>
                </header>

                <main class="app-main">
                    <div class="selectors-container">
                        <label for="map-select">{"Map: "}</label>
                        <select
                            id="map-select"
                            onchange={
                                let on_change = on_map_change.clone();
                                Callback::from(move |e: Event| {
                                    let target = e.target_dyn_into::<web_sys::HtmlSelectElement>();
                                    if let Some(select) = target {
                                        on_change.emit(select.value());
                                    }
                                })
                            }
                        >
                            {for self.manifest.maps.iter().map(|map| {
                                html! {
                                    <option
                                        value={map.id.clone()}
                                        selected={self.current_map == map.id}
                                    >
                                        {map.name.clone()}
                                    </option>
                                }
                            })}
                        </select>
                    </div>

                    if let Some(config) = current {
                        // Keyed so switching maps remounts the viewer and its controller.
                        <MapViewer key={config.id.clone()} config={config.clone()} {on_area_click} />
                    }

                    <div class="status">
                        {match &self.last_clicked {
                            Some(label) => format!("Last clicked: {}", label),
                            None => "Click an area on the image".to_string(),
                        }}
                    </div>
                </main>
            </div>
        }
    }
}

async fn load_manifest() -> Result<MapManifest, String> {
    let url = resource_url("public/maps/manifest.json");

    let resp = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Failed to fetch {}: {:?}", url, e))?;
    if !resp.ok() {
        return Err(format!("{} returned HTTP {}", url, resp.status()));
    }

    let text = resp
        .text()
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", url, e))?;
    MapManifest::from_json(&text)
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
