//! Shop tiles: buy and sell cards until the player closes the shop.

use tracing::debug;

use super::cards::CardInstance;
use super::log::LogKind;
use super::pending::PendingAction;
use super::state::{CardId, Game, GameStatus, PlayerId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopOffer {
    pub card: CardInstance,
    pub price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSession {
    pub for_player: PlayerId,
    pub level: u8,
    pub offers: Vec<ShopOffer>,
}

impl ShopSession {
    fn offer_index(&self, card_id: CardId) -> Option<usize> {
        self.offers.iter().position(|o| o.card.id == card_id)
    }
}

impl Game {
    /// Open a shop with `level` random offers (at least one) at catalogue price.
    pub(crate) fn open_shop(&mut self, player_id: PlayerId, level: u8) -> Result<(), DomainError> {
        let offers = self
            .mint_random_cards(usize::from(level.max(1)))
            .into_iter()
            .map(|card| ShopOffer {
                card,
                price: card.kind.base_price(),
            })
            .collect();
        self.open_pending(PendingAction::Shop(ShopSession {
            for_player: player_id,
            level,
            offers,
        }))?;
        let name = self.username(player_id);
        self.push_log(
            LogKind::TileEffect,
            Some(player_id),
            format!("{name} entered a level {level} shop"),
        );
        Ok(())
    }

    fn shop_for(&mut self, player_id: PlayerId) -> Result<&mut ShopSession, DomainError> {
        if self.status != GameStatus::Active {
            return Err(DomainError::game_not_active("the game is not being played"));
        }
        match self.pending.as_mut() {
            Some(PendingAction::Shop(shop)) if shop.for_player == player_id => Ok(shop),
            Some(PendingAction::Shop(_)) => {
                Err(DomainError::not_your_turn("this shop belongs to another player"))
            }
            _ => Err(DomainError::already_resolved("there is no open shop")),
        }
    }

    /// Buy the offered card `card_id`. The shop stays open.
    pub fn shop_buy(&mut self, player_id: PlayerId, card_id: CardId) -> Result<(), DomainError> {
        let shop = self.shop_for(player_id)?;
        let index = shop
            .offer_index(card_id)
            .ok_or_else(|| DomainError::no_such_target(format!("card {card_id} is not on offer")))?;
        let offer = shop.offers[index];

        let buyer = self.require_player_mut(player_id)?;
        if buyer.coins < offer.price {
            return Err(DomainError::insufficient_resource(format!(
                "card costs {} coins, you have {}",
                offer.price, buyer.coins
            )));
        }
        buyer.coins -= offer.price;
        buyer.cards.push(offer.card);
        self.shop_for(player_id)?.offers.remove(index);

        let name = self.username(player_id);
        self.push_log(
            LogKind::ShopBuy,
            Some(player_id),
            format!(
                "{name} bought {} for {} coins",
                offer.card.kind.card_type().name,
                offer.price
            ),
        );
        debug!(game_id = self.id, player_id, card_id, price = offer.price, "shop purchase");
        Ok(())
    }

    /// Sell an owned card for half its price; it becomes a shop offer.
    pub fn shop_sell(&mut self, player_id: PlayerId, card_id: CardId) -> Result<(), DomainError> {
        self.shop_for(player_id)?;
        let seller = self.require_player_mut(player_id)?;
        let index = seller.card_index(card_id).ok_or_else(|| {
            DomainError::insufficient_resource(format!("you do not hold card {card_id}"))
        })?;
        let card = seller.cards.remove(index);
        let paid = card.kind.sell_price();
        seller.coins = seller.coins.saturating_add(paid);

        self.shop_for(player_id)?.offers.push(ShopOffer {
            card,
            price: card.kind.base_price(),
        });

        let name = self.username(player_id);
        self.push_log(
            LogKind::ShopSell,
            Some(player_id),
            format!("{name} sold {} for {paid} coins", card.kind.card_type().name),
        );
        Ok(())
    }

    /// Leave the shop; this resolves it and ends the turn.
    pub fn shop_close(&mut self, player_id: PlayerId) -> Result<(), DomainError> {
        self.shop_for(player_id)?;
        self.clear_pending();
        let name = self.username(player_id);
        self.push_log(LogKind::ShopClose, Some(player_id), format!("{name} left the shop"));
        self.end_turn();
        Ok(())
    }
}
