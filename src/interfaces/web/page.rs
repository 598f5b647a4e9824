//! Server-rendered dashboard page. Charting is done client-side by Plotly
//! loaded from its CDN; the series is embedded as JSON.

use crate::domain::signal::Signal;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Latest signal shown next to the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestSignal {
    pub signal: Signal,
    /// "model" or "rule"
    pub source: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub symbol: String,
    pub symbols: Vec<String>,
    /// JSON array of indicator records
    pub series_json: String,
    pub latest: Option<LatestSignal>,
    pub notice: Option<String>,
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Makes JSON safe to inline inside a `<script>` element.
pub fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn signal_badge(latest: Option<&LatestSignal>) -> String {
    match latest {
        Some(l) => format!(
            r#"<span class="light {color}"></span> <strong>{label}</strong> <small>({source}, {ts})</small>"#,
            color = l.signal.color(),
            label = l.signal.as_str(),
            source = l.source,
            ts = escape_html(&l.timestamp),
        ),
        None => r#"<span class="light unknown"></span> <strong>unknown</strong>"#.to_string(),
    }
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let options: String = view
        .symbols
        .iter()
        .map(|s| {
            let selected = if *s == view.symbol { " selected" } else { "" };
            let s = escape_html(s);
            format!(r#"<option value="{s}"{selected}>{s}</option>"#)
        })
        .collect();

    let notice = view
        .notice
        .as_deref()
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Ichimoku · {title}</title>
<script src="{cdn}"></script>
<style>
  body {{ font-family: Arial, sans-serif; background: #1c1c1c; color: #f0f0f0; margin: 0; padding: 10px; }}
  #chart {{ width: 75%; height: 600px; display: inline-block; }}
  #panel {{ width: 23%; display: inline-block; vertical-align: top; margin-left: 2%; }}
  select {{ font-size: 1rem; padding: 3px; margin-bottom: 10px; width: 100%; }}
  .info {{ cursor: pointer; color: #0f0; font-weight: bold; margin-left: 5px; }}
  .light {{ display: inline-block; width: 14px; height: 14px; border-radius: 50%; }}
  .light.green {{ background: #2ecc40; }}
  .light.red {{ background: #ff4136; }}
  .light.yellow {{ background: #ffdc00; }}
  .light.unknown {{ background: #aaaaaa; }}
  .notice {{ color: #ffdc00; }}
</style>
</head>
<body>
<form method="get" action="/">
  <select id="symbol" name="symbol" onchange="this.form.submit()">{options}</select>
</form>
{notice}
<div id="chart"></div>
<div id="panel">
  <h3>Ichimoku signals</h3>
  <div>Tenkan <span class="info" data-key="tenkan">(i)</span></div>
  <div>Kijun <span class="info" data-key="kijun">(i)</span></div>
  <div>Senkou <span class="info" data-key="senkou">(i)</span></div>
  <div>Chikou <span class="info" data-key="chikou">(i)</span></div>
  <div id="signal" style="margin-top:10px; font-size:1.2rem;">Current signal: {badge}</div>
  <div id="infoBox" style="margin-top:10px;"></div>
</div>
<script>
const series = {series};
const INFO = {{
  tenkan: "Tenkan crossing above Kijun is bullish; crossing below is bearish.",
  kijun: "Kijun is the base line and trend reference.",
  senkou: "Price above the cloud is bullish, below is bearish, inside is neutral.",
  chikou: "Close above the close 26 periods back confirms a bullish read; below confirms bearish."
}};
document.querySelectorAll('.info').forEach(el => el.addEventListener('click', () => {{
  document.getElementById('infoBox').innerText = INFO[el.dataset.key];
}}));
if (series.length > 0) {{
  const x = series.map(d => d.timestamp);
  const col = k => series.map(d => d[k]);
  Plotly.newPlot('chart', [
    {{x, y: col('close'), type: 'scatter', mode: 'lines', name: 'Close', line: {{color: '#00BFFF', width: 2}}}},
    {{x, y: col('tenkan'), type: 'scatter', mode: 'lines', name: 'Tenkan', line: {{color: 'lime', width: 1}}}},
    {{x, y: col('kijun'), type: 'scatter', mode: 'lines', name: 'Kijun', line: {{color: 'orange', width: 1}}}},
    {{x, y: col('senkou_a'), type: 'scatter', mode: 'lines', name: 'Senkou A', line: {{color: 'pink', width: 1}}}},
    {{x, y: col('senkou_b'), type: 'scatter', mode: 'lines', name: 'Senkou B', line: {{color: 'magenta', width: 1}},
      fill: 'tonexty', fillcolor: 'rgba(255,192,203,0.3)'}},
    {{x, y: col('chikou'), type: 'scatter', mode: 'lines', name: 'Chikou', line: {{color: 'yellow', width: 1}}}}
  ], {{margin: {{t: 20}}, paper_bgcolor: '#1c1c1c', plot_bgcolor: '#1c1c1c', font: {{color: '#f0f0f0'}}}});
}}
</script>
</body>
</html>
"#,
        title = escape_html(&view.symbol),
        cdn = PLOTLY_CDN,
        options = options,
        notice = notice,
        badge = signal_badge(view.latest.as_ref()),
        series = script_safe_json(&view.series_json),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> DashboardView {
        DashboardView {
            symbol: "BTC".to_string(),
            symbols: vec!["BTC".to_string(), "ETH".to_string()],
            series_json: r#"[{"close":1.0,"note":"</script>"}]"#.to_string(),
            latest: Some(LatestSignal {
                signal: Signal::Bullish,
                source: "model",
                timestamp: "2024-01-01T00:00:00Z".to_string(),
            }),
            notice: None,
        }
    }

    #[test]
    fn test_page_embeds_series_and_selector() {
        let html = render_dashboard(&view());
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains(r#"<option value="BTC" selected>BTC</option>"#));
        assert!(html.contains(r#"<option value="ETH">ETH</option>"#));
        assert!(html.contains("light green"));
        assert!(html.contains("bullish"));
    }

    #[test]
    fn test_embedded_json_cannot_close_the_script() {
        let html = render_dashboard(&view());
        assert!(!html.contains(r#""</script>""#));
        assert!(html.contains(r#"<\/script>"#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&"), "&lt;a href=&quot;x&quot;&gt;&amp;");
    }
}
