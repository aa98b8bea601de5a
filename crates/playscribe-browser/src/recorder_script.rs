/// Name of the CDP binding the page reports interactions through
pub const BINDING_NAME: &str = "__playscribeRecord";

/// In-page recorder.
///
/// Registered for every new document and evaluated once on the current one.
/// Listeners sit on `document` in the capture phase, and the installer is
/// idempotent per document, so the mutation observer can re-run it freely
/// without double-reporting.
pub const RECORDER_SCRIPT: &str = r#"
(() => {
    const BINDING = '__playscribeRecord';

    function report(event) {
        if (typeof window[BINDING] === 'function') {
            window[BINDING](JSON.stringify(event));
        }
    }

    function elementPath(element) {
        if (!(element instanceof Element)) return [];
        const path = [];
        while (element && element.nodeType === Node.ELEMENT_NODE) {
            const tag = element.nodeName.toLowerCase();
            if (element.id) {
                path.push({ tag, id: element.id, nth: 1 });
                break;
            }
            let nth = 1;
            let sib = element;
            while ((sib = sib.previousElementSibling)) {
                if (sib.nodeName.toLowerCase() === tag) nth++;
            }
            path.push({ tag, nth });
            element = element.parentNode;
        }
        return path;
    }

    function isField(el) {
        return el && (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA');
    }

    function addListeners() {
        if (document.__playscribeInstalled) return;
        document.__playscribeInstalled = true;

        const initialValues = new WeakMap();

        document.addEventListener('click', (e) => {
            report({ kind: 'click', path: elementPath(e.target) });
        }, true);

        document.addEventListener('focusin', (e) => {
            if (isField(e.target)) initialValues.set(e.target, e.target.value);
        }, true);

        document.addEventListener('blur', (e) => {
            const el = e.target;
            if (!isField(el)) return;
            if (initialValues.has(el) && initialValues.get(el) === el.value) return;
            initialValues.set(el, el.value);
            report({
                kind: 'fill',
                path: elementPath(el),
                value: el.value,
                inputType: el.tagName === 'INPUT' ? (el.type || 'text') : null,
            });
        }, true);

        document.addEventListener('change', (e) => {
            const el = e.target;
            if (el && el.tagName === 'SELECT') {
                report({ kind: 'select', path: elementPath(el), value: el.value });
            }
        }, true);
    }

    function observe() {
        const observer = new MutationObserver((mutations) => {
            for (const mutation of mutations) {
                if (mutation.type === 'childList') {
                    addListeners();
                    break;
                }
            }
        });
        observer.observe(document.body, { childList: true, subtree: true });
    }

    addListeners();

    if (window.__playscribeObserving !== document) {
        window.__playscribeObserving = document;
        if (document.body) {
            observe();
        } else {
            document.addEventListener('DOMContentLoaded', observe, { once: true });
        }
    }

    return true;
})()
"#;
