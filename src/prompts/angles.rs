//! Narrative angles an article can take.

/// An angle id and the brief handed to the model for it.
#[derive(Debug, Clone, Copy)]
pub struct AnglePrompt {
    pub id: &'static str,
    pub brief: &'static str,
}

/// Every angle the generator knows about, in default order.
pub const ANGLE_PROMPTS: &[AnglePrompt] = &[
    AnglePrompt {
        id: "problem_solution",
        brief: r#"Tell the story of a stubborn skin problem and how this tallow balm ended up fixing it.
Open in the middle of the struggle. Name a couple of real products that let you down.
You doubted tallow at first and were honestly impressed later. Wander off topic once.
Close by saying you'll keep using it, or by recommending it in passing.
KEYWORDS to weave in naturally: "dry skin", "natural skincare", "tallow balm for [skin issue]"."#,
    },
    AnglePrompt {
        id: "ingredient_story",
        brief: r#"Explain why rubbing beef tallow on skin is less strange than it sounds.
Begin with your first, doubtful reaction and walk through what changed your mind.
Drop a little science casually, plus some old-fashioned family wisdom.
Lose the thread mid-paragraph, then come back to why you're glad you tried it.
KEYWORDS to weave in naturally: "grass-fed beef tallow", "natural ingredients", "tallow skincare benefits"."#,
    },
    AnglePrompt {
        id: "vs_commercial",
        brief: r#"Compare this tallow balm with the drugstore products you used before.
Start annoyed at one specific commercial product that never worked. Name brands.
Say plainly what difference you noticed and why tallow suits you better.
Finish on a good note about making the switch.
KEYWORDS to weave in naturally: "natural vs commercial skincare", "tallow balm review", "best natural moisturizer"."#,
    },
    AnglePrompt {
        id: "seasonal",
        brief: r#"Write about what this time of year does to your skin and where the tallow balm fits.
Open with a physical feeling caused by the weather.
Mention what you tried earlier in the season and how tallow slotted into your routine.
Add one unrelated observation. End with how it's holding up this season.
KEYWORDS to weave in naturally: "[season] skincare", "dry [season] skin", "tallow balm for [season]"."#,
    },
    AnglePrompt {
        id: "lifestyle",
        brief: r#"Describe dropping your usual skincare for this tallow balm.
Start mid-story. You were unconvinced, then the results won you over.
Include specific products, what they cost and where you bought them.
Keep the improvement believable: no makeover, just steady results.
KEYWORDS to weave in naturally: "natural skincare routine", "tallow balm daily use", "switching to natural products"."#,
    },
    AnglePrompt {
        id: "myth_busting",
        brief: r#"Take on the idea that beef fat on your face is gross, and explain why that's wrong.
Open with somebody's reaction, or your own early doubts.
Admit it sounds odd, then make the case that it makes sense.
Stand up for the product. End glad you got past the weirdness.
KEYWORDS to weave in naturally: "is tallow good for skin", "beef tallow skincare", "tallow balm benefits"."#,
    },
    AnglePrompt {
        id: "scent_focus",
        brief: r#"Write about how this scent makes the balm something you look forward to.
Start at the moment you open the jar or put it on.
Describe the smell in everyday words, not perfume-counter language.
Say when you use it and how it fits your day. End looking forward to the next time.
KEYWORDS to weave in naturally: "[scent] tallow balm", "natural [scent] skincare", "scented tallow balm review"."#,
    },
    AnglePrompt {
        id: "skin_type",
        brief: r#"Write about your skin type and why this tallow balm works for it.
Open with what your skin does and what has failed before, specifically.
Explain how you apply the tallow and what you noticed.
Finish with an honest recommendation for people with similar skin.
KEYWORDS to weave in naturally: "tallow balm for [skin type]", "natural moisturizer for [skin type]", "best tallow for [concern]"."#,
    },
    AnglePrompt {
        id: "routine",
        brief: r#"Walk through when and how you use this tallow balm day to day.
Start halfway through your routine or halfway through a thought. Give times and amounts.
Get distracted by something, then return to where the balm fits.
End by noting it's a fixed part of your routine now.
KEYWORDS to weave in naturally: "tallow balm routine", "how to use tallow balm", "daily skincare with tallow"."#,
    },
    AnglePrompt {
        id: "heritage",
        brief: r#"Cover the history of tallow in skincare and why people are coming back to it.
Start with how you heard about it: a grandparent, a late-night internet spiral, a friend.
Blend the history with your own experience.
End appreciating an old approach that still works.
KEYWORDS to weave in naturally: "traditional tallow skincare", "beef tallow history", "natural skincare comeback"."#,
    },
];

/// Brief for `id`, if the angle exists.
pub fn angle_prompt(id: &str) -> Option<&'static str> {
    ANGLE_PROMPTS.iter().find(|a| a.id == id).map(|a| a.brief)
}

/// All known angle ids in default order.
pub fn angle_ids() -> Vec<String> {
    ANGLE_PROMPTS.iter().map(|a| a.id.to_string()).collect()
}
