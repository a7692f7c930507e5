//! JavaScript evaluated inside the rendered page

/// Reports whether the document has finished loading
pub const READY_STATE_SCRIPT: &str = r#"
    (() => ({
        readyState: document.readyState,
        imagesLoaded: Array.from(document.images).every(img => img.complete),
        bodyExists: document.body !== null
    }))()
"#;

/// Reduces a stylesheet to the rules needed above the fold
///
/// Called as `(CRITICAL_CSS_SCRIPT)(cssText, width, height)`; returns the
/// critical CSS as a string.
pub const CRITICAL_CSS_SCRIPT: &str = r#"
    (function (cssText, viewportWidth, viewportHeight) {
        const sheet = new CSSStyleSheet();
        sheet.replaceSync(cssText);

        const PSEUDO = /::?(before|after|first-line|first-letter|placeholder|selection|marker|backdrop|hover|focus|focus-within|focus-visible|active|visited|target)\b(\([^)]*\))?/gi;
        const matchCache = new Map();

        const isAboveFold = (element) => {
            const rect = element.getBoundingClientRect();
            if (rect.width === 0 && rect.height === 0) {
                return false;
            }
            return rect.top < viewportHeight && rect.left < viewportWidth
                && rect.bottom > 0 && rect.right > 0;
        };

        const selectorMatches = (selector) => {
            const plain = selector.replace(PSEUDO, '').trim() || '*';
            if (matchCache.has(plain)) {
                return matchCache.get(plain);
            }
            let matched = false;
            try {
                matched = Array.from(document.querySelectorAll(plain)).some(isAboveFold);
            } catch (e) {
                matched = false;
            }
            matchCache.set(plain, matched);
            return matched;
        };

        const usedAnimations = new Set();
        const keyframes = [];

        const collectAnimations = (style) => {
            const names = style.getPropertyValue('animation-name') || '';
            names.split(',').map(n => n.trim()).filter(n => n && n !== 'none')
                .forEach(n => usedAnimations.add(n));
            const shorthand = style.getPropertyValue('animation') || '';
            shorthand.split(/[\s,]+/).filter(Boolean).forEach(n => usedAnimations.add(n));
        };

        const reduce = (rules) => {
            const kept = [];
            for (const rule of Array.from(rules)) {
                if (rule instanceof CSSStyleRule) {
                    if (rule.selectorText.split(',').some(selectorMatches)) {
                        collectAnimations(rule.style);
                        kept.push(rule.cssText);
                    }
                } else if (rule instanceof CSSMediaRule) {
                    if (window.matchMedia(rule.media.mediaText).matches) {
                        const inner = reduce(rule.cssRules);
                        if (inner.length) {
                            kept.push('@media ' + rule.media.mediaText + ' {\n' + inner.join('\n') + '\n}');
                        }
                    }
                } else if (rule instanceof CSSSupportsRule) {
                    if (CSS.supports(rule.conditionText)) {
                        const inner = reduce(rule.cssRules);
                        if (inner.length) {
                            kept.push('@supports ' + rule.conditionText + ' {\n' + inner.join('\n') + '\n}');
                        }
                    }
                } else if (rule instanceof CSSFontFaceRule) {
                    kept.push(rule.cssText);
                } else if (rule instanceof CSSKeyframesRule) {
                    keyframes.push(rule);
                }
            }
            return kept;
        };

        const critical = reduce(sheet.cssRules);
        for (const rule of keyframes) {
            if (usedAnimations.has(rule.name)) {
                critical.push(rule.cssText);
            }
        }
        return critical.join('\n');
    })
"#;

/// Swaps every page stylesheet for the given critical CSS
///
/// Called as `(APPLY_CRITICAL_CSS_SCRIPT)(cssText)`.
pub const APPLY_CRITICAL_CSS_SCRIPT: &str = r#"
    (function (cssText) {
        document.querySelectorAll('link[rel~="stylesheet"], style').forEach(node => node.remove());
        const style = document.createElement('style');
        style.textContent = cssText;
        (document.head || document.documentElement).appendChild(style);
        return true;
    })
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_check_requires_a_visible_box_inside_the_viewport() {
        assert!(CRITICAL_CSS_SCRIPT.contains("rect.width === 0 && rect.height === 0"));
        assert!(CRITICAL_CSS_SCRIPT.contains("rect.bottom > 0 && rect.right > 0"));
    }
}
