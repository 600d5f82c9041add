use actix_web::{HttpRequest, HttpResponse, web};
use rust_embed::Embed;
use tracing::{debug, trace};

// 页面样式与脚本编译期嵌入二进制
#[derive(Embed)]
#[folder = "assets/"]
struct DeckAssets;

pub struct AssetService;

impl AssetService {
    pub async fn handle_asset(req: HttpRequest) -> HttpResponse {
        let path = req.match_info().query("path");
        trace!("Serving asset: {}", path);

        match DeckAssets::get(path) {
            Some(content) => HttpResponse::Ok()
                .content_type(Self::get_content_type(path))
                .insert_header(("Cache-Control", "public, max-age=300"))
                .body(content.data.into_owned()),
            None => {
                debug!("Asset not found: {}", path);
                HttpResponse::NotFound().body("File not found")
            }
        }
    }

    /// 根据文件扩展名确定 Content-Type
    fn get_content_type(path: &str) -> &'static str {
        match path.rsplit('.').next() {
            Some("css") => "text/css; charset=utf-8",
            Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
            Some("json") => "application/json",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("svg") => "image/svg+xml",
            Some("ico") => "image/x-icon",
            Some("woff2") => "font/woff2",
            _ => "application/octet-stream",
        }
    }
}

pub fn asset_routes() -> actix_web::Scope {
    web::scope("/assets").route("/{path:.*}", web::get().to(AssetService::handle_asset))
}
