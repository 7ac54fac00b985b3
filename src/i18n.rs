//! Message catalog for server-rendered pages and emails.
//!
//! Lookups fall back to English and then to the key itself, so a missing
//! translation degrades to readable text instead of an error.

use std::collections::HashMap;

use crate::domain::Locale;

const CATALOG_EN: &[(&str, &str)] = &[
    ("site_name", "Cogworks & Co."),
    ("site_tagline", "Brass, steam and bespoke engineering."),
    ("nav_home", "Home"),
    ("nav_services", "Services"),
    ("nav_about", "About"),
    ("nav_pricing", "Pricing"),
    ("nav_contact", "Contact"),
    ("nav_newsletter", "Newsletter"),
    ("page_home_title", "Welcome to the workshop"),
    ("page_home_body", "We design, restore and maintain machines with character."),
    ("page_services_title", "Our services"),
    ("page_services_body", "From clockwork restoration to full engine commissions."),
    ("page_about_title", "About us"),
    ("page_about_body", "A small guild of engineers, artisans and tinkerers."),
    ("page_pricing_title", "Pricing"),
    ("page_pricing_body", "Book a single service or keep us on retainer."),
    ("page_contact_title", "Contact"),
    ("page_contact_body", "Tell us about your project and we will get back to you."),
    ("page_newsletter_title", "The Gazette"),
    ("page_newsletter_body", "Monthly dispatches from the workshop floor."),
    ("page_not_found_title", "Page not found"),
    ("page_not_found_body", "This corridor of the workshop does not exist."),
    ("confirm_success_title", "Subscription confirmed"),
    ("confirm_success_body", "Thank you! You will now receive our newsletter."),
    ("confirm_invalid_title", "Already confirmed or invalid link"),
    ("confirm_invalid_body", "This link has already been used or is no longer valid."),
    ("unsubscribe_success_title", "You have been unsubscribed"),
    ("unsubscribe_success_body", "You will no longer receive our newsletter."),
    ("unsubscribe_invalid_title", "Already unsubscribed or invalid link"),
    ("unsubscribe_invalid_body", "This link has already been used or is no longer valid."),
    ("missing_token_title", "Missing token"),
    ("missing_token_body", "The link you followed is incomplete."),
    ("back_to_site", "Back to the site"),
    ("email_confirm_subject", "Confirm your subscription"),
    ("email_confirm_greeting", "Thank you for subscribing to the Cogworks Gazette."),
    ("email_confirm_action", "Confirm subscription"),
    ("email_confirm_ignore", "If you did not sign up, you can ignore this email."),
    ("email_unsubscribe", "Unsubscribe"),
];

const CATALOG_SV: &[(&str, &str)] = &[
    ("site_name", "Cogworks & Co."),
    ("site_tagline", "Mässing, ånga och skräddarsydd ingenjörskonst."),
    ("nav_home", "Hem"),
    ("nav_services", "Tjänster"),
    ("nav_about", "Om oss"),
    ("nav_pricing", "Priser"),
    ("nav_contact", "Kontakt"),
    ("nav_newsletter", "Nyhetsbrev"),
    ("page_home_title", "Välkommen till verkstaden"),
    ("page_home_body", "Vi konstruerar, restaurerar och underhåller maskiner med karaktär."),
    ("page_services_title", "Våra tjänster"),
    ("page_services_body", "Från urverksrestaurering till kompletta motorbeställningar."),
    ("page_about_title", "Om oss"),
    ("page_about_body", "Ett litet skrå av ingenjörer, hantverkare och mekare."),
    ("page_pricing_title", "Priser"),
    ("page_pricing_body", "Boka en enskild tjänst eller anlita oss löpande."),
    ("page_contact_title", "Kontakt"),
    ("page_contact_body", "Berätta om ditt projekt så hör vi av oss."),
    ("page_newsletter_title", "Gazetten"),
    ("page_newsletter_body", "Månatliga rapporter från verkstadsgolvet."),
    ("page_not_found_title", "Sidan hittades inte"),
    ("page_not_found_body", "Den här korridoren i verkstaden finns inte."),
    ("confirm_success_title", "Prenumerationen är bekräftad"),
    ("confirm_success_body", "Tack! Du kommer nu att få vårt nyhetsbrev."),
    ("confirm_invalid_title", "Redan bekräftad eller ogiltig länk"),
    ("confirm_invalid_body", "Länken har redan använts eller är inte längre giltig."),
    ("unsubscribe_success_title", "Du har avregistrerats"),
    ("unsubscribe_success_body", "Du kommer inte längre att få vårt nyhetsbrev."),
    ("unsubscribe_invalid_title", "Redan avregistrerad eller ogiltig länk"),
    ("unsubscribe_invalid_body", "Länken har redan använts eller är inte längre giltig."),
    ("missing_token_title", "Token saknas"),
    ("missing_token_body", "Länken du följde är ofullständig."),
    ("back_to_site", "Tillbaka till webbplatsen"),
    ("email_confirm_subject", "Bekräfta din prenumeration"),
    ("email_confirm_greeting", "Tack för att du prenumererar på Cogworks Gazette."),
    ("email_confirm_action", "Bekräfta prenumerationen"),
    ("email_confirm_ignore", "Om du inte har anmält dig kan du ignorera detta mejl."),
    ("email_unsubscribe", "Avregistrera"),
];

const CATALOG_RU: &[(&str, &str)] = &[
    ("site_name", "Cogworks & Co."),
    ("site_tagline", "Латунь, пар и инженерия на заказ."),
    ("nav_home", "Главная"),
    ("nav_services", "Услуги"),
    ("nav_about", "О нас"),
    ("nav_pricing", "Цены"),
    ("nav_contact", "Контакты"),
    ("nav_newsletter", "Рассылка"),
    ("page_home_title", "Добро пожаловать в мастерскую"),
    ("page_home_body", "Мы проектируем, реставрируем и обслуживаем машины с характером."),
    ("page_services_title", "Наши услуги"),
    ("page_services_body", "От реставрации часовых механизмов до заказных двигателей."),
    ("page_about_title", "О нас"),
    ("page_about_body", "Небольшая гильдия инженеров, мастеров и изобретателей."),
    ("page_pricing_title", "Цены"),
    ("page_pricing_body", "Закажите разовую услугу или постоянное обслуживание."),
    ("page_contact_title", "Контакты"),
    ("page_contact_body", "Расскажите о своём проекте, и мы свяжемся с вами."),
    ("page_newsletter_title", "Газета"),
    ("page_newsletter_body", "Ежемесячные новости из мастерской."),
    ("page_not_found_title", "Страница не найдена"),
    ("page_not_found_body", "Такого коридора в мастерской нет."),
    ("confirm_success_title", "Подписка подтверждена"),
    ("confirm_success_body", "Спасибо! Теперь вы будете получать нашу рассылку."),
    ("confirm_invalid_title", "Уже подтверждено или ссылка недействительна"),
    ("confirm_invalid_body", "Эта ссылка уже использована или больше не действительна."),
    ("unsubscribe_success_title", "Вы отписались"),
    ("unsubscribe_success_body", "Вы больше не будете получать нашу рассылку."),
    ("unsubscribe_invalid_title", "Уже отписаны или ссылка недействительна"),
    ("unsubscribe_invalid_body", "Эта ссылка уже использована или больше не действительна."),
    ("missing_token_title", "Отсутствует токен"),
    ("missing_token_body", "Ссылка, по которой вы перешли, неполная."),
    ("back_to_site", "Вернуться на сайт"),
    ("email_confirm_subject", "Подтвердите подписку"),
    ("email_confirm_greeting", "Спасибо за подписку на Cogworks Gazette."),
    ("email_confirm_action", "Подтвердить подписку"),
    ("email_confirm_ignore", "Если вы не подписывались, просто проигнорируйте это письмо."),
    ("email_unsubscribe", "Отписаться"),
];

fn entries(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Sv => CATALOG_SV,
        Locale::Ru => CATALOG_RU,
    }
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    entries(locale)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Translate `key`, falling back to English and then to the key.
pub fn translate<'a>(locale: Locale, key: &'a str) -> &'a str {
    lookup(locale, key)
        .or_else(|| lookup(Locale::En, key))
        .unwrap_or(key)
}

/// Every message for `locale`, with English filling the gaps.
pub fn catalog(locale: Locale) -> HashMap<&'static str, &'static str> {
    let mut messages: HashMap<_, _> = CATALOG_EN.iter().copied().collect();
    messages.extend(entries(locale).iter().copied());
    messages
}
