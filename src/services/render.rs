use crate::host::{Region, Surface};
use crate::services::view_model::ViewModel;

/// Markup for each region written on a render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedView {
    pub regions: Vec<(Region, String)>,
}

#[cfg(test)]
impl RenderedView {
    fn get(&self, region: Region) -> Option<&str> {
        self.regions
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, html)| html.as_str())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn blocked_message(view: &ViewModel) -> String {
    format!(
        "🔒 Need {} referrals and ₹{} to withdraw",
        view.min_referrals, view.min_balance
    )
}

pub fn render(view: &ViewModel) -> RenderedView {
    let user_info = format!(
        "<p class=\"text-lg font-semibold\">{}</p>\n<p>💰 Balance: ₹{}</p>\n<p>🎰 Spins Left: {}</p>",
        escape_html(&view.welcome),
        view.balance,
        view.spins_left
    );

    let readiness = if view.eligible {
        "✅ Ready to withdraw!".to_string()
    } else {
        blocked_message(view)
    };
    let dashboard = format!(
        "<p>💰 Balance: ₹{}</p>\n<p>🎰 Spins Left: {}</p>\n<p>👥 Referrals: {}/{}</p>\n<p>🎁 Referral Earnings: ₹{}</p>\n<p>{}</p>",
        view.balance,
        view.spins_left,
        view.referral_count,
        view.min_referrals,
        view.referral_earnings,
        readiness
    );

    let referral_link = format!(
        "<p>Share your referral link:</p>\n<p class=\"break-all\">{}</p>",
        escape_html(&view.referral_link)
    );

    let status = if view.eligible {
        "✅ Eligible for withdrawal!".to_string()
    } else {
        blocked_message(view)
    };
    let withdrawal_status = format!("<p>{}</p>", status);

    RenderedView {
        regions: vec![
            (Region::UserInfo, user_info),
            (Region::DashboardContent, dashboard),
            (Region::ReferralLink, referral_link),
            (Region::WithdrawalStatus, withdrawal_status),
        ],
    }
}

pub fn error_markup(message: &str) -> String {
    format!("<p>Error: {}</p>", escape_html(message))
}

/// Replaces every region the view covers.
pub fn apply(surface: &dyn Surface, rendered: &RenderedView) {
    for (region, html) in &rendered.regions {
        surface.set_html(*region, html);
    }
}
