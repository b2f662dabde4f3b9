pub const REPORT_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: #9333ea; color: white; padding: 30px; text-align: center; border-radius: 10px; margin-bottom: 30px; }
    .grade { font-size: 48px; font-weight: bold; margin: 20px 0; }
    .section { background: #f9fafb; padding: 20px; margin: 20px 0; border-radius: 8px; border-left: 4px solid #9333ea; }
    .section-title { font-size: 18px; font-weight: bold; color: #9333ea; margin-bottom: 10px; }
    .recommendation { background: white; padding: 15px; margin: 10px 0; border-radius: 5px; border-left: 3px solid #10b981; }
    .footer { text-align: center; margin-top: 40px; padding-top: 20px; border-top: 1px solid #e5e7eb; color: #6b7280; font-size: 14px; }
  </style>
</head>
<body>
  <div class="header">
    <h1>Your Landing Page Roast Report</h1>
    <div class="grade">Grade: {{ grade }}</div>
    {% if url %}<p>{{ url }}</p>{% endif %}
  </div>
  <div class="section">
    <div class="section-title">The Roast</div>
    <p>{{ partial_roast }}</p>
  </div>
  {% for dimension in dimensions %}
  <div class="section">
    <div class="section-title">{{ dimension.label }} - {{ dimension.grade }}</div>
    <p>{{ dimension.critique }}</p>
  </div>
  {% endfor %}
  <div class="section">
    <div class="section-title">Top Recommendations</div>
    {% for item in recommendations %}
    <div class="recommendation"><strong>{{ loop.index }}.</strong> {{ item }}</div>
    {% endfor %}
  </div>
  <div class="footer">
    <p>Screenshot: <a href="{{ screenshot_url }}">{{ screenshot_url }}</a></p>
  </div>
</body>
</html>
"#;

pub const REPORT_TXT: &str = r"LANDING PAGE ROAST REPORT
=========================

Overall grade: {{ grade }}
{% if url %}URL: {{ url }}
{% endif %}
THE ROAST
{{ partial_roast }}
{% for dimension in dimensions %}
{{ dimension.label | upper }} ({{ dimension.grade }})
{{ dimension.critique }}
{% endfor %}
TOP RECOMMENDATIONS
{% for item in recommendations %}{{ loop.index }}. {{ item }}
{% endfor %}
Screenshot: {{ screenshot_url }}
";
