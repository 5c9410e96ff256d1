use log::{debug, error, info, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::env;

use crate::catalog::Restaurant;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_LOCATION: &str = "New Delhi, India";
const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4?w=400";

const SYSTEM_PROMPT: &str = r#"You are a restaurant recommendation assistant. When given a user's food craving or mood, suggest 5-8 real restaurants that would satisfy their request.

For each restaurant, provide realistic data in this exact JSON format:
{
  "restaurants": [
    {
      "id": "unique-id",
      "name": "Restaurant Name",
      "cuisine": ["Cuisine Type 1", "Cuisine Type 2"],
      "priceRange": 1-3 (1=budget, 2=moderate, 3=expensive),
      "rating": 4.0-5.0,
      "reviews": 100-1000,
      "location": "Specific Address or Area",
      "address": "Full street address with city",
      "distance": "X.X km",
      "openTime": "HH:MM AM/PM",
      "closeTime": "HH:MM AM/PM",
      "specialties": ["Dish 1", "Dish 2", "Dish 3"],
      "description": "Brief enticing description",
      "tags": ["relevant", "tags"],
      "image": "unsplash-food-image-url",
      "isVeg": true/false,
      "phone": "+1-XXX-XXX-XXXX"
    }
  ]
}

Use realistic restaurant names and addresses for the location provided. Include varied price ranges and ratings. Use high-quality Unsplash food images (use format: https://images.unsplash.com/photo-XXXXX?w=400)."#;

/// Forward a free-text craving to the OpenAI chat-completions API and parse
/// the suggested restaurant list out of the completion.
pub async fn search_restaurants(
    client: &Client,
    query: &str,
    location: Option<&str>,
) -> Result<Vec<Restaurant>, Box<dyn std::error::Error>> {
    let location = location.unwrap_or(DEFAULT_LOCATION);
    info!("AI restaurant search for {:?} in {}", query, location);
    let api_key = env::var("OPENAI_API_KEY")?;

    let user_prompt = format!(
        "User is looking for: \"{}\"\nLocation: {}\n\nSuggest restaurants that match this craving. Return ONLY valid JSON, no additional text.",
        query, location
    );

    let body = json!({
        "model": "gpt-4o-mini",
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": user_prompt }
        ],
        "temperature": 0.7,
        "max_tokens": 2000,
    });

    let response = client
        .post(OPENAI_URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response.text().await?;
        error!("OpenAI API error: {} - {}", status, error_body);
        return Err(format!("OpenAI API error: {}", status).into());
    }

    let data = response.json::<Value>().await?;
    let content = data["choices"][0]["message"]["content"]
        .as_str()
        .ok_or("No completion content in OpenAI response")?;

    debug!("OpenAI completion: {}", content);

    parse_restaurant_list(content)
}

/// The model is told to return only JSON but sometimes wraps it in prose, so
/// cut out the outermost object before parsing.
fn parse_restaurant_list(content: &str) -> Result<Vec<Restaurant>, Box<dyn std::error::Error>> {
    let raw = extract_json_object(content).ok_or("No JSON object found in completion")?;
    let value: Value = serde_json::from_str(raw)?;

    let mut restaurants: Vec<Restaurant> = serde_json::from_value(value["restaurants"].clone())
        .map_err(|e| format!("Failed to parse restaurant data: {}", e))?;

    if restaurants.is_empty() {
        return Err("OpenAI returned an empty restaurant list".into());
    }

    for r in &mut restaurants {
        if !is_trusted_image_url(&r.image) {
            warn!("Replacing untrusted image URL for {}: {}", r.name, r.image);
            r.image = PLACEHOLDER_IMAGE.to_string();
        }
    }

    info!("Parsed {} AI-suggested restaurants", restaurants.len());
    Ok(restaurants)
}

fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&content[start..=end])
}

/// Model output is untrusted; only https links to Unsplash pass through.
fn is_trusted_image_url(image: &str) -> bool {
    match url::Url::parse(image) {
        Ok(parsed) => {
            parsed.scheme() == "https" && parsed.host_str() == Some("images.unsplash.com")
        }
        Err(_) => false,
    }
}
