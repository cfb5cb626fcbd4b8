use chrono::Local;

use crate::fmt::{qty, yen};
use crate::ranking::RankedTree;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "\
        body { font-family: 'Segoe UI', 'Hiragino Sans', Meiryo, sans-serif; margin: 0; padding: 20px; background-color: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background-color: white; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); overflow: hidden; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; }
        .header h1 { margin: 0; font-size: 2.5em; font-weight: 300; }
        .header .subtitle { margin-top: 10px; font-size: 1.2em; opacity: 0.9; }
        .summary { padding: 20px; background-color: #f8f9fa; border-bottom: 1px solid #dee2e6; }
        .summary-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-top: 15px; }
        .summary-item { text-align: center; padding: 15px; background-color: white; border-radius: 6px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        .summary-item .value { font-size: 2em; font-weight: bold; color: #667eea; }
        .summary-item .label { color: #6c757d; margin-top: 5px; }
        .content { padding: 20px; }
        .category { margin-bottom: 30px; border: 1px solid #dee2e6; border-radius: 8px; overflow: hidden; }
        .category-header { background-color: #e9ecef; padding: 15px 20px; border-bottom: 1px solid #dee2e6; display: flex; justify-content: space-between; align-items: center; }
        .category-title { font-size: 1.3em; font-weight: bold; color: #495057; }
        .category-summary { color: #6c757d; font-size: 0.9em; }
        .supplier { margin: 10px; border: 1px solid #dee2e6; border-radius: 6px; overflow: hidden; }
        .supplier-header { background-color: #f8f9fa; padding: 12px 15px; border-bottom: 1px solid #dee2e6; display: flex; justify-content: space-between; align-items: center; }
        .supplier-title { font-weight: bold; color: #495057; }
        .supplier-summary { color: #6c757d; font-size: 0.9em; }
        .products-table { width: 100%; border-collapse: collapse; }
        .products-table th { background-color: #f8f9fa; padding: 10px; text-align: left; border-bottom: 1px solid #dee2e6; font-weight: bold; color: #495057; }
        .products-table td { padding: 8px 10px; border-bottom: 1px solid #dee2e6; vertical-align: top; }
        .products-table tr:hover { background-color: #f8f9fa; }
        .price { font-weight: bold; color: #dc3545; }
        .quantity { color: #6c757d; }
        .unit-info { font-size: 0.9em; color: #6c757d; }
        .footer { padding: 20px; text-align: center; color: #6c757d; border-top: 1px solid #dee2e6; background-color: #f8f9fa; }
        @media (max-width: 768px) {
            .summary-grid { grid-template-columns: 1fr; }
            .products-table { font-size: 0.9em; }
            .products-table th, .products-table td { padding: 5px; }
        }";

/// Render the ranked hierarchy as a self-contained display document.
pub fn render(tree: &RankedTree) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!(
        "    <title>仕入レポート分析 - {}</title>\n",
        escape(&tree.file_no)
    ));
    html.push_str(&format!("    <style>\n{STYLE}\n    </style>\n</head>\n<body>\n"));
    html.push_str("<div class=\"container\">\n");

    html.push_str("    <div class=\"header\">\n        <h1>仕入レポート分析</h1>\n");
    html.push_str(&format!(
        "        <div class=\"subtitle\">ファイルNo.: {}</div>\n    </div>\n",
        escape(&tree.file_no)
    ));

    html.push_str("    <div class=\"summary\">\n        <h2>概要</h2>\n        <div class=\"summary-grid\">\n");
    for (value, label) in [
        (tree.record_count.to_string(), "総レコード数"),
        (yen(tree.total_amount), "総仕入金額"),
        (tree.categories.len().to_string(), "カテゴリ数"),
    ] {
        html.push_str(&format!(
            "            <div class=\"summary-item\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>\n",
            escape(&value),
            label
        ));
    }
    html.push_str("        </div>\n    </div>\n\n    <div class=\"content\">\n");

    for category in &tree.categories {
        html.push_str("        <div class=\"category\">\n");
        html.push_str(&format!(
            "            <div class=\"category-header\">\n                <div class=\"category-title\">{}</div>\n                <div class=\"category-summary\">{}件 / {}</div>\n            </div>\n",
            escape(&category.label),
            category.record_count,
            yen(category.purchase_value)
        ));

        for supplier in &category.suppliers {
            html.push_str("            <div class=\"supplier\">\n");
            html.push_str(&format!(
                "                <div class=\"supplier-header\">\n                    <div class=\"supplier-title\">{}</div>\n                    <div class=\"supplier-summary\">{}件 / {}</div>\n                </div>\n",
                escape(&supplier.label),
                supplier.record_count,
                yen(supplier.purchase_value)
            ));
            html.push_str("                <table class=\"products-table\">\n                    <thead><tr><th>ユニットNO.</th><th>部品番号</th><th>品名</th><th>メーカー</th><th>材質・型式</th><th>数量</th><th>単価</th><th>仕入金額</th><th>受入日</th></tr></thead>\n                    <tbody>\n");
            for product in &supplier.products {
                let date = product
                    .received_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                html.push_str(&format!(
                    "                    <tr><td class=\"unit-info\">{}</td><td class=\"unit-info\">{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"quantity\">{}</td><td class=\"price\">{}</td><td class=\"price\">{}</td><td>{}</td></tr>\n",
                    escape(&product.unit),
                    escape(&product.line_no),
                    escape(&product.product_name),
                    escape(&product.manufacturer),
                    escape(&product.material_model),
                    qty(product.quantity),
                    yen(product.unit_price),
                    yen(product.purchase_value),
                    escape(&date)
                ));
            }
            html.push_str("                    </tbody>\n                </table>\n            </div>\n");
        }
        html.push_str("        </div>\n");
    }

    html.push_str("    </div>\n\n");
    html.push_str(&format!(
        "    <div class=\"footer\"><p>生成日時: {}</p></div>\n",
        Local::now().format("%Y年%m月%d日 %H:%M:%S")
    ));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
