use tracing::warn;

use crate::errors::AppError;
use crate::external::broker::BrokerApi;
use crate::external::narrative::NarrativeGenerator;
use crate::models::{ChatReply, Narrative, PortfolioMetrics, Position, StageOutcome};
use crate::services::position_service::normalize_positions;

pub const NARRATIVE_UNAVAILABLE: &str =
    "Sorry, the portfolio narrative could not be generated right now. \
     All figures above are unaffected.";

const EXPLAIN_SYSTEM_PROMPT: &str = "You are an assistant that explains a stock portfolio. \
     Do NOT give concrete buy or sell recommendations. \
     Instead explain risks, diversification and possible overweights. \
     Address the user directly. Use short paragraphs and bullet lists. \
     Write clearly and without jargon.";

const CHAT_SYSTEM_PROMPT: &str = "You are a trading assistant for a brokerage dashboard. \
     You answer the user's questions in natural language.\n\n\
     Your tasks:\n\
     - Explain and comment on open orders, positions, daily results and market moves \
     based on the data you are given.\n\
     - Help the user understand risk, volatility and exposure.\n\n\
     IMPORTANT:\n\
     - Do NOT give concrete buy or sell recommendations.\n\
     - Do not make hard predictions about the future.\n\
     - If a piece of information is not in the data, say honestly that you do not know.\n\
     - Be clear and factual, but friendly and helpful.";

/// Narrative generation as a degradable stage: any vendor failure turns into
/// the fixed apology text, with the cause recorded for `degraded_stages`.
pub async fn explain_portfolio(
    narrator: &dyn NarrativeGenerator,
    metrics: &PortfolioMetrics,
    positions: &[Position],
) -> StageOutcome<Narrative> {
    let user_prompt = build_explanation_prompt(metrics, positions);

    let result = narrator.generate(EXPLAIN_SYSTEM_PROMPT, &user_prompt).await;
    if let Err(e) = &result {
        warn!("Narrative generation failed: {}", e);
    }

    StageOutcome::from_result("narrative", result, |_| {
        Narrative::fallback(NARRATIVE_UNAVAILABLE)
    })
}

/// Portfolio Q&A for the chat endpoint. The trading context is assembled
/// best-effort; the question itself must be non-empty.
pub async fn answer_question(
    narrator: &dyn NarrativeGenerator,
    broker: &dyn BrokerApi,
    message: &str,
) -> Result<ChatReply, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".into()));
    }

    let context = build_chat_context(broker).await;
    let user_prompt = format!(
        "Here is current data about the portfolio, open orders and markets:\n\n\
         {}\n\nThe user's question is:\n{}",
        context, message
    );

    let narrative = narrator
        .generate(CHAT_SYSTEM_PROMPT, &user_prompt)
        .await
        .map_err(|e| AppError::External(format!("narrative generation failed: {}", e)))?;

    Ok(ChatReply {
        reply: narrative.text,
    })
}

/// Lays the metrics out as labelled text sections the model can quote from.
/// The heuristic comments go in marked as context so the model rephrases
/// rather than parrots them.
fn build_explanation_prompt(metrics: &PortfolioMetrics, positions: &[Position]) -> String {
    let mut prompt = String::new();

    prompt.push_str("Here is the user's current portfolio data.\n\n");

    prompt.push_str("PORTFOLIO OVERVIEW:\n");
    prompt.push_str(&format!("- Total value: {}\n", metrics.total_market_value));
    prompt.push_str(&format!("- Tech weighting: {} %\n", metrics.tech_weight));
    match &metrics.top_position {
        Some(top) => prompt.push_str(&format!(
            "- Largest position: {} ({} %)\n\n",
            top.symbol, top.weight
        )),
        None => prompt.push_str("- Largest position: -\n\n"),
    }

    prompt.push_str("SECTOR WEIGHTS (% of portfolio):\n");
    for sw in &metrics.sector_weights {
        prompt.push_str(&format!("- {}: {} %\n", sw.sector, sw.weight));
    }
    prompt.push('\n');

    prompt.push_str("INTERNAL HEURISTIC COMMENTS (context only, do not repeat verbatim):\n");
    prompt.push_str(&format!("- Risk: {}\n", metrics.risk_comment));
    prompt.push_str(&format!("- Volatility: {}\n", metrics.volatility_comment));
    prompt.push_str(&format!(
        "- Diversification: {}\n\n",
        metrics.diversification_comment
    ));

    prompt.push_str("POSITIONS:\n");
    for p in positions {
        let volatility = p
            .volatility
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        prompt.push_str(&format!(
            "- {} Sector: {}, market value: {}, unrealized P/L: {}, volatility: {}\n",
            p.symbol, p.sector, p.market_value, p.unrealized_pnl, volatility
        ));
    }
    prompt.push('\n');

    prompt.push_str("Your task:\n");
    prompt.push_str(
        "1. Explain whether the portfolio is heavily concentrated in tech or in single names.\n",
    );
    prompt.push_str("2. Describe the risk in simple terms.\n");
    prompt.push_str(
        "3. Give neutral pointers where diversification could make sense, \
         without naming concrete products.\n",
    );
    prompt.push_str("4. Stay within at most 10 sentences and avoid technical jargon.\n");

    prompt
}

/// Compact plain-text snapshot of the account for the chat prompt. Every
/// data source is optional here: whatever fails is noted as unavailable and
/// the chat still works.
async fn build_chat_context(broker: &dyn BrokerApi) -> String {
    let (account, positions, orders) = tokio::join!(
        broker.get_account(),
        broker.get_positions(),
        broker.get_open_orders()
    );

    let mut context = String::new();

    match account {
        Ok(account) => {
            context.push_str(&format!("- Cash: {}\n", account.cash));
            context.push_str(&format!("- Portfolio value: {}\n", account.portfolio_value));
        }
        Err(e) => {
            warn!("Chat context: account unavailable: {}", e);
            context.push_str("- Account data unavailable.\n");
        }
    }

    match positions {
        Ok(records) => {
            let positions = normalize_positions(records);
            let symbols: Vec<&str> = positions.iter().map(|p| p.symbol.as_str()).collect();
            context.push_str(&format!(
                "- Positions: {} ({})\n",
                positions.len(),
                symbols.join(", ")
            ));
        }
        Err(e) => {
            warn!("Chat context: positions unavailable: {}", e);
            context.push_str("- Position data unavailable.\n");
        }
    }

    match orders {
        Ok(orders) => {
            context.push_str(&format!("- Open orders: {}\n", orders.len()));
            for order in &orders {
                context.push_str(&format!(
                    "  - {} {} {} ({})\n",
                    order.side, order.qty, order.symbol, order.status
                ));
            }
        }
        Err(e) => {
            warn!("Chat context: open orders unavailable: {}", e);
            context.push_str("- Open-order data unavailable.\n");
        }
    }

    context
}
